//! Outcome of a validation call.

use crate::error::TranslationError;
use crate::registry::{ErrorId, ErrorRegistry, ErrorsMap};
use crate::translation::MessageService;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Errors found in one model, with access to their codes and messages.
///
/// Paths keep discovery order. Messages are rendered on demand from the
/// translations preloaded by the validator.
pub struct ValidationResult<'v> {
    errors: ErrorsMap,
    registry: &'v ErrorRegistry,
    messages: &'v MessageService,
}

impl<'v> ValidationResult<'v> {
    pub(crate) fn new(
        errors: ErrorsMap,
        registry: &'v ErrorRegistry,
        messages: &'v MessageService,
    ) -> Self {
        Self {
            errors,
            registry,
            messages,
        }
    }

    /// True if at least one error was recorded.
    #[must_use]
    pub fn any_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Raw path → error ids map.
    #[must_use]
    pub fn errors(&self) -> &ErrorsMap {
        &self.errors
    }

    /// Paths with errors, in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.paths()
    }

    /// Every distinct code, in discovery order.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.errors
            .iter()
            .flat_map(|(_, ids)| ids.iter())
            .flat_map(|id| self.codes_of(*id))
            .filter(|code| seen.insert(*code))
            .collect()
    }

    /// Path → codes recorded there.
    #[must_use]
    pub fn code_map(&self) -> BTreeMap<String, Vec<String>> {
        self.errors
            .iter()
            .filter_map(|(path, ids)| {
                let codes: Vec<String> = ids
                    .iter()
                    .flat_map(|id| self.codes_of(*id))
                    .map(str::to_string)
                    .collect();
                (!codes.is_empty()).then(|| (path.to_string(), codes))
            })
            .collect()
    }

    /// Path → messages in the default translation.
    #[must_use]
    pub fn message_map(&self) -> BTreeMap<String, Vec<String>> {
        // the default translation is checked when the validator is built
        self.translated_message_map(self.messages.default_translation())
            .unwrap_or_default()
    }

    /// Path → messages in translation `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::UnknownTranslation`] if no translation
    /// `name` is registered.
    pub fn translated_message_map(
        &self,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<String>>, TranslationError> {
        let mut map = BTreeMap::new();
        for (path, messages) in self.render(name)? {
            if !messages.is_empty() {
                map.insert(path, messages);
            }
        }
        Ok(map)
    }

    /// Names of the translations available for rendering.
    pub fn translation_names(&self) -> impl Iterator<Item = &str> {
        self.messages.names()
    }

    /// Owned, serializable snapshot in translation `name` (or the default).
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::UnknownTranslation`] for an unknown name.
    pub fn to_report(
        &self,
        translation: Option<&str>,
    ) -> Result<ValidationReport, TranslationError> {
        let name = translation.unwrap_or(self.messages.default_translation());
        let entries = self
            .render(name)?
            .into_iter()
            .zip(self.errors.iter())
            .map(|((path, messages), (_, ids))| ReportEntry {
                path,
                messages,
                codes: ids
                    .iter()
                    .flat_map(|id| self.codes_of(*id))
                    .map(str::to_string)
                    .collect(),
            })
            .collect();

        Ok(ValidationReport {
            valid: !self.any_errors(),
            translation: name.to_string(),
            codes: self.codes().into_iter().map(str::to_string).collect(),
            entries,
        })
    }

    fn codes_of(&self, id: ErrorId) -> impl Iterator<Item = &'v str> {
        self.registry
            .get(id)
            .into_iter()
            .flat_map(|definition| definition.all_codes())
    }

    fn render(&self, name: &str) -> Result<Vec<(String, Vec<String>)>, TranslationError> {
        self.errors
            .iter()
            .map(|(path, ids)| Ok((path.to_string(), self.messages.messages(name, path, ids)?)))
            .collect()
    }
}

impl fmt::Display for ValidationResult<'_> {
    /// Codes on the first line, then a blank line, then `path: message`
    /// lines in the default translation. Root messages have no prefix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes = self.codes();
        let rendered = self
            .render(self.messages.default_translation())
            .map_err(|_| fmt::Error)?;

        let mut lines = Vec::new();
        for (path, messages) in &rendered {
            for message in messages {
                if path.is_empty() {
                    lines.push(message.clone());
                } else {
                    lines.push(format!("{path}: {message}"));
                }
            }
        }

        if !codes.is_empty() {
            write!(f, "{}", codes.join(", "))?;
            if !lines.is_empty() {
                write!(f, "\n\n")?;
            }
        }
        write!(f, "{}", lines.join("\n"))
    }
}

impl fmt::Debug for ValidationResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationResult")
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

/// Serializable snapshot of a [`ValidationResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no error was recorded.
    pub valid: bool,
    /// Translation the messages are rendered in.
    pub translation: String,
    /// Distinct codes in discovery order.
    pub codes: Vec<String>,
    /// One entry per path, in discovery order.
    pub entries: Vec<ReportEntry>,
}

/// Errors recorded at one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Path of the value.
    pub path: String,
    /// Rendered messages.
    pub messages: Vec<String>,
    /// Codes.
    pub codes: Vec<String>,
}
