//! Error types for every failure domain of the engine.
//!
//! Failed validation rules are not errors: they are returned as data in a
//! [`crate::ValidationResult`].

use miette::Diagnostic;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A value-level mistake made while authoring a specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthoringIssue {
    /// `with_path` received a malformed path.
    #[error("invalid path `{0}`")]
    InvalidPath(String),

    /// `with_name` or a member received a malformed name.
    #[error("invalid name `{0}`")]
    InvalidName(String),

    /// A code is empty or contains whitespace.
    #[error("invalid code `{0}`: codes must be non-empty and contain no whitespace")]
    InvalidCode(String),

    /// An arg name is empty, reserved, or contains placeholder syntax.
    #[error("invalid arg name `{0}`")]
    InvalidArgName(String),

    /// Two args of one rule share a name.
    #[error("duplicate arg name `{0}`")]
    DuplicateArgName(String),

    /// A message or message key is empty.
    #[error("message must not be empty")]
    EmptyMessage,

    /// A range whose bounds are in the wrong order.
    #[error("invalid range: {min} must be {relation} {max}")]
    InvalidRange {
        /// Lower bound as text.
        min: String,
        /// Upper bound as text.
        max: String,
        /// Required relation (`less than`, `less than or equal to`).
        relation: &'static str,
    },

    /// A rule argument that cannot be used (e.g. a malformed regex).
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// An [`AuthoringIssue`] with the place it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedIssue {
    /// Type the offending specification validates.
    pub type_name: &'static str,
    /// Zero-based index of the command inside its specification.
    pub command_index: usize,
    /// The issue.
    pub issue: AuthoringIssue,
}

impl fmt::Display for LocatedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (command #{} in specification of `{}`)",
            self.issue, self.command_index, self.type_name
        )
    }
}

/// Binding a deferred specification failed.
#[derive(Debug, Error, Diagnostic)]
pub enum DefinitionError {
    /// The specification already has a body.
    #[error("specification {id} is already defined")]
    #[diagnostic(code(specval::already_defined))]
    AlreadyDefined {
        /// Identifier of the specification.
        id: u64,
    },
}

/// Compiling a specification into a model scheme failed.
#[derive(Debug, Error, Diagnostic)]
pub enum SchemeError {
    /// The specification graph contains authoring mistakes.
    #[error("invalid specification:\n{}", format_issues(.0))]
    #[diagnostic(
        code(specval::invalid_specification),
        help("fix the listed commands; each names its specification type and position")
    )]
    InvalidSpecification(Vec<LocatedIssue>),

    /// A deferred specification was never defined.
    #[error("specification {id} of `{type_name}` is referenced but never defined")]
    #[diagnostic(
        code(specval::undefined_specification),
        help("call `define` on every `Specification::deferred()` before building a validator")
    )]
    UndefinedSpecification {
        /// Identifier of the specification.
        id: u64,
        /// Type it validates.
        type_name: &'static str,
    },

    /// The configured default translation does not exist.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Translation(#[from] TranslationError),

    /// An internal invariant was violated. Never caused by valid input.
    #[error("unexpected state: {0}")]
    #[diagnostic(code(specval::unexpected_state))]
    UnexpectedState(String),
}

fn format_issues(issues: &[LocatedIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single validation call could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ValidationError {
    /// The model graph revisits a value already being validated by the same scope.
    #[error(
        "reference loop in `{type_name}`: value at `{second_path}` was already entered at `{first_path}`"
    )]
    #[diagnostic(
        code(specval::reference_loop),
        help("break the cycle in the model or disable reference loop protection if the data is acyclic")
    )]
    ReferenceLoop {
        /// Type of the revisited value.
        type_name: &'static str,
        /// Path where the value was first entered.
        first_path: String,
        /// Path where it was entered again.
        second_path: String,
    },

    /// An internal invariant was violated. Never caused by valid input.
    #[error("unexpected state: {0}")]
    #[diagnostic(code(specval::unexpected_state))]
    UnexpectedState(String),
}

/// Rendering messages failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TranslationError {
    /// No translation is registered under this name.
    #[error("unknown translation `{0}`")]
    #[diagnostic(code(specval::unknown_translation))]
    UnknownTranslation(String),
}

/// Loading settings failed.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(specval::config_io))]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The TOML could not be parsed.
    #[error("failed to parse settings: {0}")]
    #[diagnostic(code(specval::config_parse))]
    Parse(#[from] toml::de::Error),

    /// The settings parsed but are not usable.
    #[error("invalid settings: {0}")]
    #[diagnostic(code(specval::config_invalid))]
    Invalid(String),
}
