//! Core extraction engine.
//!
//! - `parsers`: Python source parsing into the expression tree
//! - `syntax`: expression tree types
//! - `analyzer`: translation call extraction and validation
//! - `pool`: strings collected over a directory
//! - `catalog`: per-language `.popie` files
//! - `discovery`: mapping of input paths to i18n directories

pub mod analyzer;
pub mod catalog;
pub mod discovery;
pub mod parsers;
pub mod pool;
pub mod syntax;

pub use analyzer::Analyzer;
pub use catalog::Catalog;
pub use pool::StringPool;
