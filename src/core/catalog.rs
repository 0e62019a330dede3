//! Per-language translation catalog (`po/<lang>.popie`).
//!
//! The file is a flat list of records:
//!
//! ```text
//! msgid Hello!
//! msgstr Ahoj!
//!
//! msgid Bye!
//! msgstr
//! ```
//!
//! A bare `msgstr` line means the string is not translated yet.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use similar::TextDiff;

use crate::core::pool::StringPool;

/// Directory holding catalogs, relative to the i18n directory.
pub const CATALOG_DIR: &str = "po";

pub const CATALOG_EXTENSION: &str = "popie";

const MSGID: &str = "msgid";
const MSGSTR: &str = "msgstr";

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// Message key to optional translation, in file order.
pub type Translations = IndexMap<String, Option<String>>;

#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    translations: Translations,
    /// Placeholder mismatches between keys and their translations.
    errors: Vec<String>,
    /// File content at load time; `None` if the file did not exist.
    before: Option<String>,
    /// File content written by the last `save`.
    after: Option<String>,
}

impl Catalog {
    /// Path of the catalog for `language` inside an i18n directory.
    pub fn path_for(directory: &Path, language: &str) -> PathBuf {
        directory
            .join(CATALOG_DIR)
            .join(format!("{}.{}", language, CATALOG_EXTENSION))
    }

    /// Load the catalog of `language` inside an i18n directory.
    pub fn for_language(directory: &Path, language: &str) -> Result<Self> {
        Self::load(&Self::path_for(directory, language))
    }

    /// Load a catalog file. A missing file is an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        let before = match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read catalog: {}", path.display()));
            }
        };

        let translations = before.as_deref().map(parse_catalog).unwrap_or_default();
        let mut catalog = Self {
            path: path.to_path_buf(),
            translations,
            errors: Vec::new(),
            before,
            after: None,
        };
        catalog.validate();
        Ok(catalog)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Number of entries that have a translation.
    pub fn translated_count(&self) -> usize {
        self.translations
            .values()
            .filter(|translation| translation.is_some())
            .count()
    }

    /// Rebuild the catalog from the strings found in the latest scan.
    ///
    /// Existing translations are carried over, new strings start untranslated,
    /// and keys that are no longer in the pool are dropped.
    pub fn update(&mut self, pool: &StringPool) {
        let mut previous = std::mem::take(&mut self.translations);

        for string in pool.iter() {
            if self.translations.contains_key(string) {
                continue;
            }
            let translation = previous.swap_remove(string).flatten();
            self.translations.insert(string.to_string(), translation);
        }
        for stale in previous.keys() {
            debug!("Dropping unused string '{}' from {}", stale, self.path.display());
        }

        self.validate();
    }

    /// Serialized file content.
    pub fn render(&self) -> String {
        self.translations
            .iter()
            .map(|(msgid, msgstr)| match msgstr {
                Some(msgstr) => format!("{} {}\n{} {}\n", MSGID, msgid, MSGSTR, msgstr),
                None => format!("{} {}\n{}\n", MSGID, msgid, MSGSTR),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the catalog, creating the catalog directory if needed.
    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = self.render();
        fs::write(&self.path, &content)
            .with_context(|| format!("Failed to write catalog: {}", self.path.display()))?;
        self.after = Some(content);
        Ok(())
    }

    /// Whether the last `save` changed the file content.
    pub fn is_updated(&self) -> bool {
        match &self.after {
            Some(after) => self.before.as_deref() != Some(after.as_str()),
            None => false,
        }
    }

    /// Unified diff between the loaded and the saved content, with `label`
    /// naming the file in the diff header.
    pub fn diff(&self, label: &str) -> Option<String> {
        let after = self.after.as_deref()?;
        let before = self.before.as_deref().unwrap_or_default();
        if before == after {
            return None;
        }

        let diff = TextDiff::from_lines(before, after)
            .unified_diff()
            .context_radius(3)
            .header(label, label)
            .to_string();
        Some(diff)
    }

    fn validate(&mut self) {
        self.errors = self
            .translations
            .iter()
            .filter_map(|(msgid, msgstr)| {
                let msgstr = msgstr.as_deref()?;
                let expected = placeholders(msgid);
                let found = placeholders(msgstr);
                (expected != found).then(|| {
                    format!(
                        "Translation for '{}' contains bad variables: {}.",
                        msgid,
                        found.into_iter().collect::<Vec<_>>().join(", ")
                    )
                })
            })
            .collect();
    }
}

/// Parse catalog content into translations.
///
/// Keys are taken verbatim after `msgid ` (a bare `msgid` is the empty key),
/// translations lose surrounding spaces and tabs. A `msgstr` line stores the
/// translation of the closest preceding `msgid`. Blank lines are skipped.
pub fn parse_catalog(content: &str) -> Translations {
    let mut translations = Translations::new();
    let mut msgid = String::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(id) = field(line, MSGID) {
            msgid = id.to_string();
        } else if let Some(msgstr) = field(line, MSGSTR) {
            let msgstr = msgstr.trim_matches([' ', '\t']);
            let msgstr = (!msgstr.is_empty()).then(|| msgstr.to_string());
            translations.insert(msgid.clone(), msgstr);
        }
    }

    translations
}

/// Value of a `<keyword> <value>` line, or `""` for a bare keyword.
fn field<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(' ')
}

/// Names of `{placeholder}` variables in a message.
pub fn placeholders(text: &str) -> BTreeSet<String> {
    PLACEHOLDER_REGEX
        .captures_iter(text)
        .map(|captures| captures[1].to_string())
        .collect()
}
