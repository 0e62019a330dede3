//! Expression tree consumed by the analyzer.
//!
//! The parser lowers the concrete syntax tree into this small set of node kinds.
//! Everything the analyzer does not care about structurally ends up in
//! [`Expr::Other`], which only keeps its children so nested calls are still found.

/// Start position of a node: 1-based line, 0-based byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub body: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Call(Call),
    Name(Name),
    Attribute(Attribute),
    Literal(Literal),
    Sequence(Sequence),
    Mapping(Mapping),
    BinOp(BinOp),
    Other(Other),
}

impl Expr {
    pub fn position(&self) -> Position {
        match self {
            Expr::Call(node) => node.position,
            Expr::Name(node) => node.position,
            Expr::Attribute(node) => node.position,
            Expr::Literal(node) => node.position,
            Expr::Sequence(node) => node.position,
            Expr::Mapping(node) => node.position,
            Expr::BinOp(node) => node.position,
            Expr::Other(node) => node.position,
        }
    }

    /// Short human-readable name of the node kind, used in messages.
    pub fn describe(&self) -> String {
        match self {
            Expr::Call(_) => "call".to_string(),
            Expr::Name(_) => "name".to_string(),
            Expr::Attribute(_) => "attribute".to_string(),
            Expr::Literal(_) => "literal".to_string(),
            Expr::Sequence(node) => node.kind.to_string(),
            Expr::Mapping(_) => "dict".to_string(),
            Expr::BinOp(_) => "binary operation".to_string(),
            Expr::Other(node) => node.kind.replace('_', " "),
        }
    }
}

/// `func(args..., name=value...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub position: Position,
    pub func: Box<Expr>,
    /// Positional arguments, `*args` included.
    pub args: Vec<Expr>,
    /// Values of keyword arguments; `**kwargs` entries are kept as `Other`.
    pub keywords: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub position: Position,
    pub id: String,
}

/// `value.attr`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub position: Position,
    pub value: Box<Expr>,
    pub attr: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub position: Position,
    pub value: Constant,
}

/// Value of a literal constant. Numbers keep their source spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Str(String),
    Bytes(Vec<u8>),
    Int(String),
    Float(String),
    Complex(String),
    Bool(bool),
    None,
    Ellipsis,
}

impl Constant {
    /// Name of the Python type of this constant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Constant::Str(_) => "str",
            Constant::Bytes(_) => "bytes",
            Constant::Int(_) => "int",
            Constant::Float(_) => "float",
            Constant::Complex(_) => "complex",
            Constant::Bool(_) => "bool",
            Constant::None => "NoneType",
            Constant::Ellipsis => "ellipsis",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Constant::Str(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    List,
    Tuple,
    Set,
}

impl std::fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceKind::List => write!(f, "list"),
            SequenceKind::Tuple => write!(f, "tuple"),
            SequenceKind::Set => write!(f, "set"),
        }
    }
}

/// List, tuple or set display.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub position: Position,
    pub kind: SequenceKind,
    pub elements: Vec<Expr>,
}

/// Dict display. `**spread` entries only contribute a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub position: Position,
    pub keys: Vec<Expr>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub position: Position,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// Any other expression or statement, named by its grammar kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Other {
    pub position: Position,
    pub kind: String,
    pub children: Vec<Expr>,
}
