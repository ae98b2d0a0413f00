//! Settings preloaded with the built-in rule messages.

use specval_core::{
    ConfigError, SchemeError, Settings, SettingsFile, Specification, Validator, ENGLISH,
};
use specval_rules::translations::ENGLISH_RULES;
use std::path::Path;
use tracing::debug;

/// Config file names to search for, in priority order.
pub const CONFIG_CANDIDATES: &[&str] = &["specval.toml", ".specval.toml"];

/// Default settings: the engine's English entries plus every rule message.
#[must_use]
pub fn settings() -> Settings {
    Settings::new().with_translation(ENGLISH, ENGLISH_RULES)
}

/// Compiles `spec` with [`settings`].
///
/// # Errors
///
/// See [`Validator::with_settings`].
pub fn validator<T: 'static>(spec: &Specification<T>) -> Result<Validator<T>, SchemeError> {
    Validator::with_settings(spec, settings())
}

/// Loads the first config file of [`CONFIG_CANDIDATES`] found in `dir`.
///
/// Returns [`settings`] unchanged if there is none.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_settings(dir: &Path) -> Result<Settings, ConfigError> {
    for candidate in CONFIG_CANDIDATES {
        let path = dir.join(candidate);
        if path.is_file() {
            return load_settings_file(&path);
        }
    }

    debug!(dir = %dir.display(), "No settings file found, using defaults");
    Ok(settings())
}

/// Loads a TOML settings file and merges it over [`settings`].
///
/// # Errors
///
/// Returns an error if the file cannot be read, is malformed, or names an
/// unknown default translation.
pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file: SettingsFile = toml::from_str(&content)?;

    debug!(path = %path.display(), "Loaded settings file");
    settings().apply(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_know_rule_messages() {
        let settings = settings();
        let english = settings.translations().get(ENGLISH).expect("english");
        assert_eq!(english["Global.Required"], "Required");
        assert_eq!(
            english["Texts.MinLength"],
            "Must be at least {min} characters in length"
        );
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = load_settings(dir.path()).expect("defaults");
        assert_eq!(loaded, settings());
    }

    #[test]
    fn first_candidate_wins() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join("specval.toml"),
            "reference_loop_protection = true\n",
        )
        .expect("write");
        std::fs::write(
            dir.path().join(".specval.toml"),
            "reference_loop_protection = false\n",
        )
        .expect("write");

        let loaded = load_settings(dir.path()).expect("settings");
        assert_eq!(loaded.reference_loop_protection(), Some(true));
    }
}
