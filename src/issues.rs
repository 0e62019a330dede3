//! Located records produced by the analyzer.
//!
//! Every record points at a position in a source file:
//! - `Diagnostic`: an error or warning about a translation call
//! - `ExtractedString`: a translatable string found in the source

use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================
// Severity
// ============================================================

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks the catalog update of the whole directory.
    Error,
    /// Informational only.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

// ============================================================
// LocatedText
// ============================================================

/// Text attached to a position in a source file.
///
/// `line` is 1-based, `column` is a 0-based byte offset into the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedText {
    pub source_file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub text: String,
}

impl LocatedText {
    pub fn new(source_file: &Path, line: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            source_file: source_file.to_path_buf(),
            line,
            column,
            text: text.into(),
        }
    }
}

impl fmt::Display for LocatedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {}",
            self.source_file.display(),
            self.line,
            self.column,
            self.text
        )
    }
}

// ============================================================
// Diagnostic
// ============================================================

/// Problem found in a translation call. `location.text` holds the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: LocatedText,
}

impl Diagnostic {
    pub fn error(location: LocatedText) -> Self {
        Self {
            severity: Severity::Error,
            location,
        }
    }

    pub fn warning(location: LocatedText) -> Self {
        Self {
            severity: Severity::Warning,
            location,
        }
    }

    pub fn message(&self) -> &str {
        &self.location.text
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.location.fmt(f)
    }
}

// ============================================================
// ExtractedString
// ============================================================

/// Translatable string literal found in a `_()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedString {
    pub location: LocatedText,
    /// Filled in by catalog merge; always `None` right after extraction.
    pub translation: Option<String>,
}

impl ExtractedString {
    pub fn new(location: LocatedText) -> Self {
        Self {
            location,
            translation: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.location.text
    }
}
