use std::{fmt, fs, path::Path};

use anyhow::{Context, Result, anyhow};
use tree_sitter::{Node, Parser};

use crate::core::discovery::display_path;
use crate::core::syntax::{
    Attribute, BinOp, Call, Constant, Expr, Literal, Mapping, Module, Name, Other,
    Position, Sequence, SequenceKind,
};

/// Source file that is not valid Python.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub file_path: String,
    /// Position of the first syntax error.
    pub position: Position,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to parse Python file: {}:{}:{} (invalid syntax)",
            self.file_path, self.position.line, self.position.column
        )
    }
}

impl std::error::Error for ParseError {}

/// Read and parse a Python file. Errors name the file relative to the working directory.
pub fn parse_python_file(path: &Path) -> Result<Module> {
    let code = fs::read_to_string(path)
        .with_context(|| format!("Failed to read Python file: {}", path.display()))?;
    parse_python_source(&code, &display_path(path))
}

/// Parse Python source code into the analyzer's expression tree.
///
/// The grammar is error tolerant, so any error or missing node in the tree is
/// turned into a hard failure here.
pub fn parse_python_source(code: &str, file_path: &str) -> Result<Module> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .context("Failed to load the Python grammar")?;

    let tree = parser
        .parse(code, None)
        .ok_or_else(|| anyhow!("Failed to parse Python file: {}", file_path))?;

    let root = tree.root_node();
    if root.has_error() {
        let position = first_error(root).map(node_position).unwrap_or_default();
        return Err(ParseError {
            file_path: file_path.to_string(),
            position,
        }
        .into());
    }

    let lowering = Lowering {
        source: code.as_bytes(),
    };
    Ok(Module {
        body: lowering.children(root),
    })
}

fn node_position(node: Node<'_>) -> Position {
    let point = node.start_position();
    Position::new(point.row + 1, point.column)
}

fn first_error<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'tree>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

/// Named children without comments and other extras.
fn named_children<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

struct Lowering<'a> {
    source: &'a [u8],
}

impl<'a> Lowering<'a> {
    fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source).unwrap_or_default()
    }

    fn children(&self, node: Node<'_>) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .map(|child| self.expr(child))
            .collect()
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        let position = node_position(node);
        match node.kind() {
            "call" => self.call(node, position),
            "identifier" => Expr::Name(Name {
                position,
                id: self.text(node).to_string(),
            }),
            "attribute" => self.attribute(node, position),
            "string" | "concatenated_string" => self.string(node, position),
            "integer" | "float" => {
                let text = self.text(node).to_string();
                let value = if text.ends_with(['j', 'J']) {
                    Constant::Complex(text)
                } else if node.kind() == "integer" {
                    Constant::Int(text)
                } else {
                    Constant::Float(text)
                };
                Expr::Literal(Literal { position, value })
            }
            "true" | "false" => Expr::Literal(Literal {
                position,
                value: Constant::Bool(node.kind() == "true"),
            }),
            "none" => Expr::Literal(Literal {
                position,
                value: Constant::None,
            }),
            "ellipsis" => Expr::Literal(Literal {
                position,
                value: Constant::Ellipsis,
            }),
            "list" | "tuple" | "set" => {
                let kind = match node.kind() {
                    "list" => SequenceKind::List,
                    "tuple" => SequenceKind::Tuple,
                    _ => SequenceKind::Set,
                };
                Expr::Sequence(Sequence {
                    position,
                    kind,
                    elements: self.children(node),
                })
            }
            "dictionary" => self.mapping(node, position),
            "binary_operator" => self.binary_operator(node, position),
            "parenthesized_expression" => match named_children(node).as_slice() {
                [inner] => self.expr(*inner),
                _ => self.other(node, position),
            },
            _ => self.other(node, position),
        }
    }

    fn other(&self, node: Node<'_>, position: Position) -> Expr {
        Expr::Other(Other {
            position,
            kind: node.kind().to_string(),
            children: self.children(node),
        })
    }

    fn call(&self, node: Node<'_>, position: Position) -> Expr {
        let Some(function) = node.child_by_field_name("function") else {
            return self.other(node, position);
        };

        let mut args = Vec::new();
        let mut keywords = Vec::new();

        if let Some(arguments) = node.child_by_field_name("arguments") {
            if arguments.kind() == "argument_list" {
                for argument in named_children(arguments) {
                    match argument.kind() {
                        "keyword_argument" => {
                            let value = match argument.child_by_field_name("value") {
                                Some(value) => self.expr(value),
                                None => self.other(argument, node_position(argument)),
                            };
                            keywords.push(value);
                        }
                        "dictionary_splat" => {
                            keywords.push(self.other(argument, node_position(argument)))
                        }
                        _ => args.push(self.expr(argument)),
                    }
                }
            } else {
                // f(x for x in xs)
                args.push(self.expr(arguments));
            }
        }

        Expr::Call(Call {
            position,
            func: Box::new(self.expr(function)),
            args,
            keywords,
        })
    }

    fn attribute(&self, node: Node<'_>, position: Position) -> Expr {
        let (Some(object), Some(attr)) = (
            node.child_by_field_name("object"),
            node.child_by_field_name("attribute"),
        ) else {
            return self.other(node, position);
        };

        Expr::Attribute(Attribute {
            position,
            value: Box::new(self.expr(object)),
            attr: self.text(attr).to_string(),
        })
    }

    fn mapping(&self, node: Node<'_>, position: Position) -> Expr {
        let mut keys = Vec::new();
        let mut values = Vec::new();

        for child in named_children(node) {
            if child.kind() == "pair" {
                if let (Some(key), Some(value)) = (
                    child.child_by_field_name("key"),
                    child.child_by_field_name("value"),
                ) {
                    keys.push(self.expr(key));
                    values.push(self.expr(value));
                }
            } else {
                values.push(self.expr(child));
            }
        }

        Expr::Mapping(Mapping {
            position,
            keys,
            values,
        })
    }

    fn binary_operator(&self, node: Node<'_>, position: Position) -> Expr {
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return self.other(node, position);
        };
        Expr::BinOp(BinOp {
            position,
            left: Box::new(self.expr(left)),
            right: Box::new(self.expr(right)),
        })
    }

    /// Lower a string or an implicit concatenation of strings.
    ///
    /// f-strings are not constants; only their interpolated expressions are kept.
    fn string(&self, node: Node<'_>, position: Position) -> Expr {
        let parts = if node.kind() == "concatenated_string" {
            named_children(node)
        } else {
            vec![node]
        };
        let tokens: Vec<Option<StringToken>> = parts
            .iter()
            .map(|part| StringToken::decode(self.text(*part)))
            .collect();

        if tokens
            .iter()
            .any(|token| token.as_ref().is_none_or(|token| token.formatted))
        {
            let children = parts
                .iter()
                .flat_map(|part| self.interpolations(*part))
                .collect();
            return Expr::Other(Other {
                position,
                kind: "f-string".to_string(),
                children,
            });
        }

        let tokens: Vec<StringToken> = tokens.into_iter().flatten().collect();
        let value = if tokens.iter().all(|token| !token.bytes) {
            Constant::Str(tokens.into_iter().map(|token| token.value).collect())
        } else if tokens.iter().all(|token| token.bytes) {
            Constant::Bytes(
                tokens
                    .into_iter()
                    .flat_map(|token| token.value.into_bytes())
                    .collect(),
            )
        } else {
            return self.other(node, position);
        };

        Expr::Literal(Literal { position, value })
    }

    fn interpolations(&self, node: Node<'_>) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "interpolation")
            .filter_map(|child| child.child_by_field_name("expression"))
            .map(|expression| self.expr(expression))
            .collect()
    }
}

/// A single string literal token with its prefix flags resolved.
#[derive(Debug, PartialEq)]
struct StringToken {
    formatted: bool,
    bytes: bool,
    value: String,
}

impl StringToken {
    fn decode(raw: &str) -> Option<Self> {
        let quote_start = raw.find(['\'', '"'])?;
        let prefix = raw[..quote_start].to_ascii_lowercase();
        let quoted = &raw[quote_start..];

        let quote_len = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
            3
        } else {
            1
        };
        if quoted.len() < quote_len * 2 {
            return None;
        }
        let body = quoted[quote_len..quoted.len() - quote_len].replace("\r\n", "\n");

        let value = if prefix.contains('r') {
            body
        } else {
            unescape(&body, prefix.contains('b'))
        };

        Some(Self {
            formatted: prefix.contains('f'),
            bytes: prefix.contains('b'),
            value,
        })
    }
}

/// Resolve backslash escapes the way Python does for non-raw literals.
///
/// Bytes literals have no `\u`, `\U` or `\N{...}` escapes.
fn unescape(body: &str, bytes: bool) -> String {
    let mut result = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(index) = rest.find('\\') {
        result.push_str(&rest[..index]);
        let escape = &rest[index + 1..];
        let Some(next) = escape.chars().next() else {
            result.push('\\');
            rest = "";
            break;
        };

        let consumed = match next {
            // line continuation
            '\n' => 1,
            '\\' | '\'' | '"' => {
                result.push(next);
                1
            }
            'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' => {
                result.push(match next {
                    'a' => '\x07',
                    'b' => '\x08',
                    'f' => '\x0c',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    _ => '\x0b',
                });
                1
            }
            '0'..='7' => {
                let digits = escape
                    .bytes()
                    .take(3)
                    .take_while(|byte| (b'0'..=b'7').contains(byte))
                    .count();
                push_code_point(&mut result, &escape[..digits], 8);
                digits
            }
            'N' if !bytes => match named_character(&escape[1..]) {
                Some((decoded, length)) => {
                    result.push(decoded);
                    1 + length
                }
                None => {
                    result.push('\\');
                    result.push(next);
                    1
                }
            },
            'x' | 'u' | 'U' if next == 'x' || !bytes => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                match escape[1..]
                    .get(..width)
                    .filter(|digits| digits.bytes().all(|byte| byte.is_ascii_hexdigit()))
                {
                    Some(digits) => {
                        push_code_point(&mut result, digits, 16);
                        1 + width
                    }
                    None => {
                        result.push('\\');
                        result.push(next);
                        1
                    }
                }
            }
            _ => {
                result.push('\\');
                result.push(next);
                next.len_utf8()
            }
        };
        rest = &escape[consumed..];
    }

    result.push_str(rest);
    result
}

/// `{NAME}` at the start of `text`: the named character and the length of
/// the braced part.
fn named_character(text: &str) -> Option<(char, usize)> {
    let name = text.strip_prefix('{')?;
    let end = name.find('}')?;
    let decoded = unicode_names2::character(&name[..end])?;
    Some((decoded, end + 2))
}

fn push_code_point(result: &mut String, digits: &str, radix: u32) {
    let decoded = u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    result.push(decoded);
}
