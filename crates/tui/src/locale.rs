//! Localized strings.
//!
//! Each language ships an embedded JSON mapping; a file under
//! `<data_dir>/translations/<code>.json` overrides it. Lookups walk the dotted
//! key through the loaded mapping, then a small built-in fallback table, and
//! finally return the key itself, so rendering never fails while a mapping is
//! missing.

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};

use lms_types::{Language, Signal};
use lms_util::UserPreferences;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

const EMBEDDED_EN: &str = include_str!("../data/translations/en.json");
const EMBEDDED_VI: &str = include_str!("../data/translations/vi.json");

pub const DEFAULT_LANGUAGE: Language = Language::En;

/// Strings available before (or without) any mapping.
pub const FALLBACK_TRANSLATIONS: &[(&str, &str)] = &[
    ("app.title", "LMS"),
    ("common.logout", "Logout"),
    ("common.login", "Login"),
    ("theme.toggle", "Theme"),
    ("nav.dashboard", "Dashboard"),
    ("dashboard.welcome", "Welcome back!"),
    ("dashboard.overview", "Overview"),
    ("footer.copyright", "© 2024 LMS. All rights reserved."),
];

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("failed to read translations: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse translations: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("translations for '{language}' are not a JSON object")]
    NotAnObject { language: Language },
}

/// Active language plus its loaded mapping.
#[derive(Debug)]
pub struct Locale {
    preferences: Arc<UserPreferences>,
    override_dir: Option<PathBuf>,
    language: Language,
    translations: Option<Value>,
}

impl Locale {
    /// Creates a provider with nothing loaded; lookups use the fallback
    /// table until [`Locale::init`] or [`Locale::set_language`] completes.
    pub fn new(preferences: Arc<UserPreferences>, data_dir: Option<&Path>) -> Self {
        Self {
            preferences,
            override_dir: data_dir.map(|dir| dir.join("translations")),
            language: DEFAULT_LANGUAGE,
            translations: None,
        }
    }

    /// Loads the persisted language, or the default.
    pub async fn init(&mut self) -> Option<Signal> {
        let language = self.preferences.preferred_language().unwrap_or(DEFAULT_LANGUAGE);
        self.set_language(language).await
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn language_label(&self) -> &'static str {
        self.language.label()
    }

    /// Whether a mapping is loaded; false means only fallbacks resolve.
    pub fn is_loaded(&self) -> bool {
        self.translations.is_some()
    }

    /// Switches to `language`.
    ///
    /// A mapping that fails to load falls back to the default language; if
    /// that fails too, lookups keep using the fallback table. Returns the
    /// `LanguageChanged` signal when a mapping was installed.
    pub async fn set_language(&mut self, language: Language) -> Option<Signal> {
        let mut candidates = vec![language];
        if language != DEFAULT_LANGUAGE {
            candidates.push(DEFAULT_LANGUAGE);
        }

        for candidate in candidates {
            match self.load_translations(candidate).await {
                Ok(mapping) => {
                    self.translations = Some(mapping);
                    self.language = candidate;
                    if let Err(error) = self.preferences.set_preferred_language(candidate) {
                        warn!(error = %error, "failed to persist language preference");
                    }
                    info!(language = %candidate, "language loaded");
                    return Some(Signal::LanguageChanged { language: candidate });
                }
                Err(error) => {
                    warn!(language = %candidate, error = %error, "failed to load translations");
                }
            }
        }
        None
    }

    /// Switches by language code; unsupported codes are ignored.
    pub async fn set_language_code(&mut self, code: &str) -> Option<Signal> {
        match code.parse::<Language>() {
            Ok(language) => self.set_language(language).await,
            Err(_) => {
                debug!(code, "ignoring unsupported language");
                None
            }
        }
    }

    /// Flips between English and Vietnamese.
    pub async fn toggle_language(&mut self) -> Option<Signal> {
        self.set_language(self.language.toggled()).await
    }

    /// Resolves `key` against the mapping, then the fallback table, then
    /// returns the key unchanged.
    pub fn translate<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        if let Some(text) = self.translations.as_ref().and_then(|mapping| lookup(mapping, key)) {
            return Cow::Borrowed(text);
        }
        if let Some(text) = fallback(key) {
            return Cow::Borrowed(text);
        }
        debug!(key, "translation key not found");
        Cow::Borrowed(key)
    }

    /// Like [`Locale::translate`], then replaces the first `{name}` for each
    /// parameter.
    pub fn translate_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut text = self.translate(key).into_owned();
        for (name, value) in params {
            text = text.replacen(&format!("{{{name}}}"), value, 1);
        }
        text
    }

    async fn load_translations(&self, language: Language) -> Result<Value, LocaleError> {
        let raw = match self.read_override(language).await? {
            Some(contents) => contents,
            None => embedded(language).to_string(),
        };
        let mapping: Value = serde_json::from_str(&raw)?;
        if !mapping.is_object() {
            return Err(LocaleError::NotAnObject { language });
        }
        Ok(mapping)
    }

    async fn read_override(&self, language: Language) -> Result<Option<String>, LocaleError> {
        let Some(dir) = self.override_dir.as_ref() else {
            return Ok(None);
        };
        let path = dir.join(format!("{}.json", language.code()));
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                debug!(path = %path.display(), "using translation override");
                Ok(Some(contents))
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

fn embedded(language: Language) -> &'static str {
    match language {
        Language::En => EMBEDDED_EN,
        Language::Vi => EMBEDDED_VI,
    }
}

fn lookup<'a>(mapping: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(mapping, |node, segment| node.as_object()?.get(segment))?
        .as_str()
}

fn fallback(key: &str) -> Option<&'static str> {
    FALLBACK_TRANSLATIONS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, text)| *text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn locale(data_dir: Option<&Path>) -> Locale {
        Locale::new(Arc::new(UserPreferences::ephemeral()), data_dir)
    }

    #[test]
    fn unloaded_locale_uses_fallbacks_then_key() {
        let locale = locale(None);
        assert!(!locale.is_loaded());
        assert_eq!(locale.translate("nav.dashboard"), "Dashboard");
        assert_eq!(locale.translate("nav.sections.learning"), "nav.sections.learning");
    }

    #[tokio::test]
    async fn loads_embedded_mapping_and_persists_choice() {
        let preferences = Arc::new(UserPreferences::ephemeral());
        let mut locale = Locale::new(preferences.clone(), None);
        let signal = locale.set_language(Language::Vi).await;
        assert_eq!(signal, Some(Signal::LanguageChanged { language: Language::Vi }));
        assert_eq!(locale.translate("nav.sections.learning"), "Học tập");
        assert_eq!(preferences.preferred_language(), Some(Language::Vi));

        locale.toggle_language().await;
        assert_eq!(locale.language(), Language::En);
        assert_eq!(locale.translate("nav.home"), "Home");
    }

    #[tokio::test]
    async fn broken_override_falls_back_to_default_language() {
        let dir = tempdir().expect("tempdir");
        let translations = dir.path().join("translations");
        std::fs::create_dir_all(&translations).expect("mkdir");
        std::fs::write(translations.join("vi.json"), "{ not json").expect("write");

        let mut locale = locale(Some(dir.path()));
        let signal = locale.set_language(Language::Vi).await;
        assert_eq!(signal, Some(Signal::LanguageChanged { language: Language::En }));
        assert_eq!(locale.language(), Language::En);
    }

    #[tokio::test]
    async fn unusable_mappings_leave_fallback_table_in_place() {
        let dir = tempdir().expect("tempdir");
        let translations = dir.path().join("translations");
        std::fs::create_dir_all(&translations).expect("mkdir");
        std::fs::write(translations.join("en.json"), "[1, 2]").expect("write");

        let mut locale = locale(Some(dir.path()));
        assert!(locale.set_language(Language::En).await.is_none());
        assert!(!locale.is_loaded());
        assert_eq!(locale.translate("common.logout"), "Logout");
    }

    #[tokio::test]
    async fn override_replaces_embedded_strings() {
        let dir = tempdir().expect("tempdir");
        let translations = dir.path().join("translations");
        std::fs::create_dir_all(&translations).expect("mkdir");
        std::fs::write(translations.join("en.json"), r#"{"nav": {"home": "Start"}}"#).expect("write");

        let mut locale = locale(Some(dir.path()));
        locale.set_language(Language::En).await;
        assert_eq!(locale.translate("nav.home"), "Start");
        assert_eq!(locale.translate("nav.courses"), "nav.courses");
    }

    #[tokio::test]
    async fn unsupported_codes_are_ignored() {
        let mut locale = locale(None);
        assert!(locale.set_language_code("fr").await.is_none());
        assert!(!locale.is_loaded());
    }

    #[tokio::test]
    async fn placeholders_replace_first_occurrence() {
        let mut locale = locale(None);
        locale.init().await;
        assert_eq!(locale.translate_with("auth.loginSuccess", &[("name", "Alice")]), "Welcome, Alice!");
        assert_eq!(locale.translate_with("nav.missing", &[("name", "x")]), "nav.missing");
    }

    #[test]
    fn lookup_requires_string_leaf() {
        let mapping: Value = serde_json::json!({"nav": {"sections": {"learning": "Learning"}}});
        assert_eq!(lookup(&mapping, "nav.sections.learning"), Some("Learning"));
        assert_eq!(lookup(&mapping, "nav.sections"), None);
        assert_eq!(lookup(&mapping, "nav.sections.learning.deeper"), None);
    }
}
