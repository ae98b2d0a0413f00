//! Validator settings.

use crate::error::ConfigError;
use crate::translation::{Translations, ENGLISH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings applied to a [`Validator`](crate::Validator).
///
/// ```
/// use specval_core::Settings;
///
/// let settings = Settings::parse(r#"
/// reference_loop_protection = true
///
/// [translations.English]
/// "Global.Required" = "Must be provided"
/// "#).unwrap();
///
/// assert_eq!(settings.reference_loop_protection(), Some(true));
/// assert_eq!(
///     settings.translations().get("English").unwrap()["Global.Required"],
///     "Must be provided"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    translations: Translations,
    default_translation: String,
    reference_loop_protection: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translations: Translations::core(),
            default_translation: ENGLISH.to_string(),
            reference_loop_protection: None,
        }
    }
}

/// On-disk form of [`Settings`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    /// Translation used by [`ValidationResult::message_map`](crate::ValidationResult::message_map).
    #[serde(default)]
    pub default_translation: Option<String>,

    /// Forces reference loop protection on or off.
    #[serde(default)]
    pub reference_loop_protection: Option<bool>,

    /// Entries merged over the built-in translations.
    #[serde(default)]
    pub translations: Translations,
}

impl Settings {
    /// Creates the default settings: built-in English, protection following
    /// the scheme.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses settings from a TOML string, merging them over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or names a default
    /// translation that does not exist.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: SettingsFile = toml::from_str(content)?;
        Self::default().apply(file)
    }

    /// Applies a parsed settings file on top of these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the resulting default translation
    /// does not exist.
    pub fn apply(mut self, file: SettingsFile) -> Result<Self, ConfigError> {
        self.translations.merge(file.translations);
        if let Some(name) = file.default_translation {
            self.default_translation = name;
        }
        if file.reference_loop_protection.is_some() {
            self.reference_loop_protection = file.reference_loop_protection;
        }

        if !self.translations.contains(&self.default_translation) {
            return Err(ConfigError::Invalid(format!(
                "default translation `{}` is not defined",
                self.default_translation
            )));
        }
        Ok(self)
    }

    /// Adds translation entries.
    #[must_use]
    pub fn with_translation<K, V>(
        mut self,
        name: &str,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.translations.extend(name, entries);
        self
    }

    /// Selects the default translation.
    #[must_use]
    pub fn with_default_translation(mut self, name: impl Into<String>) -> Self {
        self.default_translation = name.into();
        self
    }

    /// Forces reference loop protection on or off.
    #[must_use]
    pub fn with_reference_loop_protection(mut self, enabled: bool) -> Self {
        self.reference_loop_protection = Some(enabled);
        self
    }

    /// Registered translations.
    #[must_use]
    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// Name of the default translation.
    #[must_use]
    pub fn default_translation(&self) -> &str {
        &self.default_translation
    }

    /// Explicit protection setting; `None` follows the scheme.
    #[must_use]
    pub fn reference_loop_protection(&self) -> Option<bool> {
        self.reference_loop_protection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_translation(), ENGLISH);
        assert_eq!(settings.reference_loop_protection(), None);
        assert!(settings.translations().contains(ENGLISH));
    }

    #[test]
    fn parse_merges_over_builtins() {
        let settings = Settings::parse(
            r#"
default_translation = "Polish"

[translations.Polish]
"Global.Required" = "Wymagane"

[translations.English]
"Global.Error" = "Invalid"
"#,
        )
        .unwrap();

        assert_eq!(settings.default_translation(), "Polish");
        let english = settings.translations().get(ENGLISH).unwrap();
        assert_eq!(english["Global.Error"], "Invalid");
        assert_eq!(english["Global.Required"], "Required");
    }

    #[test]
    fn unknown_default_translation_is_invalid() {
        let result = Settings::parse(r#"default_translation = "Elvish""#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml() {
        assert!(matches!(
            Settings::parse("reference_loop_protection = maybe"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reference_loop_protection = false").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.reference_loop_protection(), Some(false));

        let missing = Settings::from_file(Path::new("/nonexistent/specval.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
