//! Multilingual labels.
//!
//! Titles, legend entries and axis names are shown in several languages at
//! once, joined with `" / "`. A renderer whose font has no glyphs for one of
//! the languages drops that translation instead of drawing tofu boxes.

use serde::{Deserialize, Serialize};

/// Separator placed between translations.
pub const SEPARATOR: &str = " / ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    German,
    Chinese,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    parts: Vec<(Language, String)>,
}

impl Label {
    /// A label with only an English text.
    pub fn new(english: impl Into<String>) -> Self {
        Self {
            parts: vec![(Language::English, english.into())],
        }
    }

    /// Add (or replace) the German translation.
    pub fn de(self, text: impl Into<String>) -> Self {
        self.with(Language::German, text)
    }

    /// Add (or replace) the Chinese translation.
    pub fn zh(self, text: impl Into<String>) -> Self {
        self.with(Language::Chinese, text)
    }

    pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
        let text = text.into();
        match self.parts.iter_mut().find(|(l, _)| *l == language) {
            Some(part) => part.1 = text,
            None => self.parts.push((language, text)),
        }
        self
    }

    /// All translations joined with the separator.
    pub fn full(&self) -> String {
        self.render(|_| true)
    }

    /// Join the translations accepted by `keep`.
    ///
    /// The first translation is always kept so the result is never empty.
    pub fn render<F>(&self, mut keep: F) -> String
    where
        F: FnMut(&str) -> bool,
    {
        self.parts
            .iter()
            .enumerate()
            .filter(|(i, (_, text))| *i == 0 || keep(text))
            .map(|(_, (_, text))| text.as_str())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_label() {
        let label = Label::new("Market").de("Markt").zh("市场");
        assert_eq!(label.full(), "Market / Markt / 市场");
    }

    #[test]
    fn test_render_drops_rejected_translations() {
        let label = Label::new("Legend").de("Legende").zh("图例");
        let ascii_only = label.render(|t| t.is_ascii());
        assert_eq!(ascii_only, "Legend / Legende");
    }

    #[test]
    fn test_first_translation_always_kept() {
        let label = Label::new("Port").de("Hafen");
        assert_eq!(label.render(|_| false), "Port");
    }

    #[test]
    fn test_repeated_language_replaces_text() {
        let label = Label::new("Port").de("Hafn").zh("港口").de("Hafen");
        assert_eq!(label.full(), "Port / Hafen / 港口");
    }
}
