//! Translations and message rendering.

pub mod engine;
pub mod placeholder;

pub use engine::{
    to_title_case, translate_messages, translate_messages_with_path_placeholders,
    TranslatedMessages,
};
pub use placeholder::{parse_placeholders, ArgPlaceholder};

use crate::error::TranslationError;
use crate::registry::{ErrorId, ErrorRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Name of the built-in translation.
pub const ENGLISH: &str = "English";

/// Message key → template.
pub type Dictionary = BTreeMap<String, String>;

/// Entries of the built-in English translation used by the engine itself.
pub const CORE_ENGLISH: [(&str, &str); 4] = [
    ("Global.Error", "Error"),
    ("Global.Required", "Required"),
    ("Global.Forbidden", "Forbidden"),
    ("Global.ReferenceLoop", "(reference loop)"),
];

/// Named dictionaries: translation name → message key → template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations {
    tables: BTreeMap<String, Dictionary>,
}

impl Translations {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding the engine's English entries.
    #[must_use]
    pub fn core() -> Self {
        Self::new().with(ENGLISH, CORE_ENGLISH)
    }

    /// Adds (or overwrites) entries of translation `name`.
    #[must_use]
    pub fn with<K, V>(mut self, name: &str, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.extend(name, entries);
        self
    }

    /// Sets one entry.
    pub fn insert(&mut self, name: &str, key: impl Into<String>, template: impl Into<String>) {
        self.tables
            .entry(name.to_string())
            .or_default()
            .insert(key.into(), template.into());
    }

    /// Adds (or overwrites) entries of translation `name`.
    pub fn extend<K, V>(&mut self, name: &str, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.tables.entry(name.to_string()).or_default();
        table.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Merges `other` into this set key by key; `other` wins on conflicts.
    pub fn merge(&mut self, other: Translations) {
        for (name, table) in other.tables {
            self.tables.entry(name).or_default().extend(table);
        }
    }

    /// Dictionary of translation `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Dictionary> {
        self.tables.get(name)
    }

    /// True if translation `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Translation names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// Every registered error pre-rendered in every translation.
#[derive(Debug)]
pub(crate) struct MessageService {
    default_translation: String,
    tables: BTreeMap<String, Vec<TranslatedMessages>>,
}

impl MessageService {
    pub(crate) fn new(
        translations: &Translations,
        default_translation: &str,
        registry: &ErrorRegistry,
    ) -> Result<Self, TranslationError> {
        if !translations.contains(default_translation) {
            return Err(TranslationError::UnknownTranslation(
                default_translation.to_string(),
            ));
        }

        let tables: BTreeMap<String, Vec<TranslatedMessages>> = translations
            .tables
            .iter()
            .map(|(name, dictionary)| {
                let rendered = registry
                    .iter()
                    .map(|(_, error)| translate_messages(dictionary, error))
                    .collect();
                (name.clone(), rendered)
            })
            .collect();

        debug!(
            translations = tables.len(),
            errors = registry.len(),
            "Preloaded translations"
        );

        Ok(Self {
            default_translation: default_translation.to_string(),
            tables,
        })
    }

    pub(crate) fn default_translation(&self) -> &str {
        &self.default_translation
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Messages of `errors`, recorded at `path`, in translation `name`.
    pub(crate) fn messages(
        &self,
        name: &str,
        path: &str,
        errors: &[ErrorId],
    ) -> Result<Vec<String>, TranslationError> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| TranslationError::UnknownTranslation(name.to_string()))?;

        let mut messages = Vec::new();
        for id in errors {
            let Some(translated) = table.get(id.index()) else {
                continue;
            };
            if translated.path_placeholders.is_empty() {
                messages.extend(translated.messages.iter().cloned());
            } else {
                messages.extend(translate_messages_with_path_placeholders(
                    path,
                    &translated.messages,
                    &translated.path_placeholders,
                ));
            }
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ErrorDefinition;

    #[test]
    fn merge_overrides_per_key() {
        let mut base = Translations::core();
        base.merge(Translations::new().with(ENGLISH, [("Global.Error", "Invalid")]).with("Polish", [("Global.Error", "Błąd")]));

        let english = base.get(ENGLISH).unwrap();
        assert_eq!(english["Global.Error"], "Invalid");
        assert_eq!(english["Global.Required"], "Required");
        assert_eq!(base.names().collect::<Vec<_>>(), vec![ENGLISH, "Polish"]);
    }

    #[test]
    fn service_renders_with_path() {
        let mut registry = ErrorRegistry::new();
        let required = registry.register(ErrorDefinition::new("Global.Required", vec![]));
        let named = registry.register(ErrorDefinition::new("{_name} is wrong", vec![]));

        let service = MessageService::new(&Translations::core(), ENGLISH, &registry).unwrap();
        assert_eq!(
            service.messages(ENGLISH, "Address.Street", &[required, named]).unwrap(),
            vec!["Required", "Street is wrong"]
        );
        assert_eq!(
            service.messages("Klingon", "", &[required]),
            Err(TranslationError::UnknownTranslation("Klingon".into()))
        );
    }

    #[test]
    fn service_requires_default_translation() {
        let registry = ErrorRegistry::new();
        assert!(MessageService::new(&Translations::new(), ENGLISH, &registry).is_err());
    }
}
