//! # specval-core
//!
//! Specification-driven validation of object graphs.
//!
//! This crate provides the engine behind `specval`:
//!
//! - [`Specification`] and [`SpecBuilder`] for declaring rules per type
//! - [`ModelScheme`] compiling a specification graph once, deduplicating
//!   error definitions
//! - [`Validator`] traversing models and returning a [`ValidationResult`]
//! - [`paths`] for the dotted/indexed path algebra
//! - [`translation`] for message templates and their placeholders
//!
//! ## Example
//!
//! ```
//! use specval_core::{Specification, Validator};
//!
//! struct Order {
//!     lines: Vec<u32>,
//! }
//!
//! let quantity = Specification::<u32>::new(|s| s.rule(|q| *q > 0).with_message("Must be positive"));
//! let lines = Specification::<Vec<u32>>::new(move |s| s.as_collection(quantity.clone()));
//! let order = Specification::<Order>::new(move |s| s.member("Lines", |o| &o.lines, lines.clone()));
//!
//! let validator = Validator::new(&order).unwrap();
//! let result = validator.validate(&Order { lines: vec![1, 0, 2] }).unwrap();
//! assert_eq!(result.paths().collect::<Vec<_>>(), vec!["Lines.#1"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod result;
mod settings;
mod validation;
mod validator;

/// Typed args of error definitions.
pub mod args;
/// Path algebra.
pub mod paths;
/// Error definitions and maps.
pub mod registry;
/// Compiled specification graphs.
pub mod scheme;
/// Specification authoring.
pub mod specification;
/// Message translation.
pub mod translation;

pub use args::{Arg, ArgValue};
pub use error::{
    AuthoringIssue, ConfigError, DefinitionError, LocatedIssue, SchemeError, TranslationError,
    ValidationError,
};
pub use registry::{ErrorDefinition, ErrorId, ErrorRegistry, ErrorsMap};
pub use result::{ReportEntry, ValidationReport, ValidationResult};
pub use scheme::factory::{FORBIDDEN_KEY, REFERENCE_LOOP_KEY, REQUIRED_KEY};
pub use scheme::{LinkKind, ModelScheme, ScopeId};
pub use settings::{Settings, SettingsFile};
pub use specification::{PresenceCommands, SpecBuilder, SpecId, Specification, ERROR_KEY};
pub use translation::{Dictionary, Translations, ENGLISH};
pub use validator::Validator;
