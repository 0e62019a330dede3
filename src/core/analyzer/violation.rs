use std::fmt;

/// Name of the deprecated context variable that is still accepted.
pub const DEPRECATED_CONTEXT: &str = "tc";

/// Context variable that replaces [`DEPRECATED_CONTEXT`].
pub const DEPRECATED_CONTEXT_REPLACEMENT: &str = "utx";

/// Reason why a translation call was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// `_(ctx)`, `_(ctx, "a", "b")`
    ArgumentCount(usize),
    /// `_(ctx, "{x}".format(x=x))`
    FormatPlacement,
    /// `_(ctx, text)`
    NonLiteral,
    /// `_(foo, "Text")`
    ContextName { name: String, accepted: Vec<String> },
    /// `_(self.foo, "Text")`, `_(other.ctx, "Text")`
    ContextAttribute { attr: String, accepted: Vec<String> },
    /// `_("ctx", "Text")`, `_(get_ctx(), "Text")`
    ContextKind(String),
    /// `_(ctx, 42)`
    StringType(&'static str),
    LeadingWhitespace,
    TrailingWhitespace,
    Newline,
}

fn quoted_list<'a>(names: impl Iterator<Item = &'a str>, prefix: &str) -> String {
    names
        .map(|name| format!("'{}{}'", prefix, name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ArgumentCount(count) => {
                write!(f, "Bad argument count (expected 2, got {}).", count)
            }
            Violation::FormatPlacement => write!(
                f,
                "Bad '.format()' placement in translation function \
                 (has to be outside of '_()' call.)"
            ),
            Violation::NonLiteral => {
                write!(f, "Bad string argument (has to be literal, not variable).")
            }
            Violation::ContextName { name, accepted } => write!(
                f,
                "Translation context variable has to be one of {}, got '{}'.",
                quoted_list(accepted.iter().map(String::as_str), ""),
                name
            ),
            Violation::ContextAttribute { attr, accepted } => write!(
                f,
                "Translation context attribute has to be one of {}, got '{}'.",
                quoted_list(accepted.iter().map(String::as_str), "self."),
                attr
            ),
            Violation::ContextKind(kind) => {
                write!(f, "Translation context has to be a variable, got {}.", kind)
            }
            Violation::StringType(type_name) => write!(
                f,
                "Translation string has to be of type 'str', not '{}'.",
                type_name
            ),
            Violation::LeadingWhitespace => {
                write!(f, "Translation string must not start with whitespace.")
            }
            Violation::TrailingWhitespace => {
                write!(f, "Translation string must not end with whitespace.")
            }
            Violation::Newline => write!(f, "Translation string must not contain newlines."),
        }
    }
}

/// Message for the accepted-but-deprecated context variable.
pub fn deprecated_context_message() -> String {
    format!(
        "Translation context variable name '{old}' is deprecated, use '{new}' instead. \
         '{old}' may not be accepted in the future.",
        old = DEPRECATED_CONTEXT,
        new = DEPRECATED_CONTEXT_REPLACEMENT
    )
}
