use crate::issues::ExtractedString;

/// Strings found across all files of one directory, in discovery order.
///
/// Duplicates are kept; the catalog collapses them since it is keyed by text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringPool {
    strings: Vec<String>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_strings(&mut self, strings: &[ExtractedString]) {
        self.strings
            .extend(strings.iter().map(|string| string.text().to_string()));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StringPool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            strings: iter.into_iter().map(Into::into).collect(),
        }
    }
}
