//! Extraction of translatable strings from a parsed Python file.
//!
//! The analyzer walks the whole tree looking for calls of the form
//! `_(ctx, "Text")`. Every such call is validated; valid ones contribute their
//! string, invalid ones a diagnostic. A bad call never stops the traversal.
//!
//! Chained formatting (`_(ctx, "Hi {name}").format(name=name)`) needs no
//! special handling: the `.format` call's receiver is the translation call,
//! which is reached while descending into the callee.

mod violation;


use std::io::{self, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::core::syntax::{Attribute, Call, Constant, Expr, Module, Position};
use crate::issues::{Diagnostic, ExtractedString, LocatedText};

pub use violation::{
    DEPRECATED_CONTEXT, DEPRECATED_CONTEXT_REPLACEMENT, Violation, deprecated_context_message,
};

/// Name of the translation function.
pub const TRANSLATION_FUNCTION: &str = "_";

/// Instance name accepted for attribute contexts (`self.ctx`).
const CONTEXT_INSTANCE: &str = "self";

/// Single-use analysis state for one source file.
///
/// # Usage
///
/// ```ignore
/// let module = parse_python_file(&path)?;
/// let mut analyzer = Analyzer::new(&path, &config.contexts);
/// analyzer.analyze(&module);
/// analyzer.report_errors(&mut io::stdout().lock())?;
/// ```
#[derive(Debug)]
pub struct Analyzer {
    file_path: PathBuf,
    /// Accepted context variable names.
    contexts: Vec<String>,
    strings: Vec<ExtractedString>,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Analyzer {
    pub fn new(file_path: &Path, contexts: &[String]) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
            contexts: contexts.to_vec(),
            strings: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn analyze(&mut self, module: &Module) {
        for expr in &module.body {
            self.visit(expr);
        }
    }

    /// Strings found so far, in traversal order.
    pub fn strings(&self) -> &[ExtractedString] {
        &self.strings
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn report_errors<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for error in &self.errors {
            writeln!(writer, "{} {}", "Analyzer error:".red().bold(), error)?;
        }
        Ok(())
    }

    pub fn report_warnings<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for warning in &self.warnings {
            writeln!(writer, "{} {}", "Analyzer warning:".yellow().bold(), warning)?;
        }
        Ok(())
    }

    // ============================================================
    // Traversal
    // ============================================================

    fn visit(&mut self, expr: &Expr) {
        match expr {
            Expr::Call(call) => self.visit_call(call),
            Expr::Attribute(attribute) => self.visit(&attribute.value),
            Expr::Sequence(sequence) => {
                for element in &sequence.elements {
                    self.visit(element);
                }
            }
            Expr::Mapping(mapping) => {
                for key in &mapping.keys {
                    self.visit(key);
                }
                for value in &mapping.values {
                    self.visit(value);
                }
            }
            Expr::BinOp(binop) => {
                self.visit(&binop.left);
                self.visit(&binop.right);
            }
            Expr::Other(other) => {
                for child in &other.children {
                    self.visit(child);
                }
            }
            Expr::Name(_) | Expr::Literal(_) => {}
        }
    }

    fn visit_call(&mut self, call: &Call) {
        // Nested calls come first: the receiver of a chained call, then arguments.
        self.visit(&call.func);
        for arg in &call.args {
            self.visit(arg);
        }
        for keyword in &call.keywords {
            self.visit(keyword);
        }

        if !is_translation_function(&call.func) {
            return;
        }

        let position = call.func.position();
        if let Err(violation) = self.check_translation_call(call, position) {
            let location = self.locate(position, violation.to_string());
            self.errors.push(Diagnostic::error(location));
        }
    }

    // ============================================================
    // Validation
    // ============================================================

    fn check_translation_call(&mut self, call: &Call, position: Position) -> Result<(), Violation> {
        let [context, text] = call.args.as_slice() else {
            return Err(Violation::ArgumentCount(call.args.len()));
        };

        if is_format_call(text) {
            return Err(Violation::FormatPlacement);
        }
        let Expr::Literal(literal) = text else {
            return Err(Violation::NonLiteral);
        };

        self.check_context(context, position)?;
        let value = check_string(&literal.value)?;

        let location = self.locate(literal.position, value);
        self.strings.push(ExtractedString::new(location));
        Ok(())
    }

    fn check_context(&mut self, context: &Expr, position: Position) -> Result<(), Violation> {
        match context {
            Expr::Name(name) if self.accepts(&name.id) => Ok(()),
            Expr::Name(name) if name.id == DEPRECATED_CONTEXT => {
                let location = self.locate(position, deprecated_context_message());
                self.warnings.push(Diagnostic::warning(location));
                Ok(())
            }
            Expr::Name(name) => Err(Violation::ContextName {
                name: name.id.clone(),
                accepted: self.contexts.clone(),
            }),
            Expr::Attribute(attribute) => {
                let on_instance = matches!(
                    attribute.value.as_ref(),
                    Expr::Name(instance) if instance.id == CONTEXT_INSTANCE
                );
                if on_instance && self.accepts(&attribute.attr) {
                    return Ok(());
                }

                let attr = if on_instance {
                    attribute.attr.clone()
                } else {
                    dotted_name(attribute)
                };
                Err(Violation::ContextAttribute {
                    attr,
                    accepted: self.contexts.clone(),
                })
            }
            other => Err(Violation::ContextKind(other.describe())),
        }
    }

    fn accepts(&self, name: &str) -> bool {
        self.contexts.iter().any(|context| context == name)
    }

    fn locate(&self, position: Position, text: impl Into<String>) -> LocatedText {
        LocatedText::new(&self.file_path, position.line, position.column, text)
    }
}

fn is_translation_function(func: &Expr) -> bool {
    matches!(func, Expr::Name(name) if name.id == TRANSLATION_FUNCTION)
}

/// `<anything>.format(...)`
fn is_format_call(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Call(call) if matches!(call.func.as_ref(), Expr::Attribute(attr) if attr.attr == "format")
    )
}

/// Content rules for an extracted string.
fn check_string(value: &Constant) -> Result<&str, Violation> {
    let Some(text) = value.as_str() else {
        return Err(Violation::StringType(value.type_name()));
    };

    if text.starts_with([' ', '\t']) {
        return Err(Violation::LeadingWhitespace);
    }
    if text.ends_with([' ', '\t']) {
        return Err(Violation::TrailingWhitespace);
    }
    if text.contains(['\n', '\r']) {
        return Err(Violation::Newline);
    }
    Ok(text)
}

/// `a.b.c` for attribute chains on plain names, `...c` otherwise.
fn dotted_name(attribute: &Attribute) -> String {
    fn prefix(expr: &Expr) -> Option<String> {
        match expr {
            Expr::Name(name) => Some(name.id.clone()),
            Expr::Attribute(attribute) => {
                prefix(&attribute.value).map(|value| format!("{}.{}", value, attribute.attr))
            }
            _ => None,
        }
    }

    match prefix(&attribute.value) {
        Some(value) => format!("{}.{}", value, attribute.attr),
        None => format!("...{}", attribute.attr),
    }
}
