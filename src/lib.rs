//! PoPie - translation string extractor for strawberry.py
//!
//! PoPie is a CLI tool and library that finds every `_(ctx, "Text")` call in the
//! Python sources of a strawberry.py project and keeps per-language `.popie`
//! catalogs in sync with them. Existing translations are preserved, new strings
//! are added untranslated and strings that are no longer used are dropped.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, output, exit status)
//! - `config`: Configuration file loading and parsing
//! - `core`: Parsing, string extraction and catalog synchronization
//! - `issues`: Located strings and diagnostics

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
