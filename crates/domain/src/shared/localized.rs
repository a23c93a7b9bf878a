use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Locale used when neither the requested locale nor its base language
/// has a translation.
pub const FALLBACK_LOCALE: &str = "en";

/// A text with one translation per locale, e.g. `{"en": "Hello", "de": "Hallo"}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locale: &str, text: &str) -> Self {
        self.set(locale, text);
        self
    }

    pub fn set(&mut self, locale: &str, text: &str) {
        self.0.insert(locale.to_string(), text.to_string());
    }

    /// Picks the translation for `locale`, falling back to the base language
    /// (`de` for `de-informal`), then to `FALLBACK_LOCALE` and finally to any
    /// non-empty translation.
    pub fn localize(&self, locale: &str) -> &str {
        let base = locale.split('-').next().unwrap_or(locale);
        [locale, base, FALLBACK_LOCALE]
            .iter()
            .filter_map(|l| self.0.get(*l))
            .find(|text| !text.trim().is_empty())
            .or_else(|| self.0.values().find(|text| !text.trim().is_empty()))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// True when no locale has a non-blank translation
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|text| text.trim().is_empty())
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::new().with(FALLBACK_LOCALE, text)
    }
}
