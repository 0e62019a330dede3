//! Source parsers.
//!
//! - `python`: Python source parser (uses tree-sitter for the concrete syntax tree)

pub mod python;
