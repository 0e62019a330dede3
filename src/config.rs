use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::core::analyzer::{DEPRECATED_CONTEXT, TRANSLATION_FUNCTION};

pub const CONFIG_FILE_NAME: &str = ".popierc.json";

/// Project configuration, read from the project root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Languages to keep catalogs for. English is the source language and is implicit.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Accepted names of the translation context variable.
    #[serde(default = "default_contexts")]
    pub contexts: Vec<String>,
}

pub fn default_languages() -> Vec<String> {
    ["cs", "sk"].map(String::from).to_vec()
}

// 'ctx' is the command context, 'utx' a translation context with user and
// guild information, 'gtx' one with guild information only.
pub fn default_contexts() -> Vec<String> {
    ["ctx", "utx", "gtx"].map(String::from).to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            contexts: default_contexts(),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl Config {
    /// Validate configuration values.
    ///
    /// Language codes become file names, so they must be plain ASCII words.
    /// Contexts must be Python identifiers other than `_` and the deprecated name.
    pub fn validate(&self) -> Result<()> {
        for language in &self.languages {
            if language.is_empty()
                || !language
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                bail!("Invalid language code in 'languages': \"{}\"", language);
            }
        }

        if self.contexts.is_empty() {
            bail!("At least one translation context has to be configured in 'contexts'");
        }
        for context in &self.contexts {
            if !is_identifier(context)
                || context == TRANSLATION_FUNCTION
                || context == DEPRECATED_CONTEXT
            {
                bail!("Invalid context name in 'contexts': \"{}\"", context);
            }
        }

        Ok(())
    }

    /// Replace configured languages with the ones given on the command line.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        if !languages.is_empty() {
            self.languages = languages;
        }
        self
    }
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

/// Load `.popierc.json` from the project root, falling back to defaults.
pub fn load_config(root: &Path) -> Result<ConfigLoadResult> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        });
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.validate()?;

    Ok(ConfigLoadResult {
        config,
        from_file: true,
    })
}
