//! # specval
//!
//! Specification-driven validation with path-addressed, translatable error
//! messages.
//!
//! This is the facade crate: it re-exports the engine from `specval-core`,
//! the built-in rules from `specval-rules`, and provides settings that already
//! carry the English messages of those rules.
//!
//! ## Quick Start
//!
//! ```
//! use specval::prelude::*;
//!
//! struct User {
//!     name: String,
//!     age: u8,
//! }
//!
//! let name = Specification::<String>::new(|s| s.not_empty().and().max_length(20));
//! let age = Specification::<u8>::new(|s| s.greater_than_or_equal_to(18));
//! let user = Specification::<User>::new(move |s| {
//!     s.member("Name", |u| &u.name, name.clone())
//!         .and()
//!         .member("Age", |u| &u.age, age.clone())
//! });
//!
//! let validator = specval::validator(&user).unwrap();
//! let result = validator.validate(&User { name: String::new(), age: 16 }).unwrap();
//!
//! assert_eq!(
//!     result.to_string(),
//!     "Name: Must not be empty\nAge: Must be greater than or equal to 18"
//! );
//! ```
//!
//! ## Configuration
//!
//! [`load_settings`] looks for `specval.toml` (or `.specval.toml`) in a
//! directory and merges it over the defaults:
//!
//! ```toml
//! default_translation = "Polish"
//!
//! [translations.Polish]
//! "Global.Required" = "Wymagane"
//! "Texts.NotEmpty" = "Nie może być puste"
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export core types and traits
pub use specval_core::*;

/// Built-in rules and their English messages.
pub mod rules {
    pub use specval_rules::*;
}

mod defaults;

pub use defaults::{load_settings, load_settings_file, settings, validator, CONFIG_CANDIDATES};

/// Everything needed to author specifications and run validators.
pub mod prelude {
    pub use crate::rules::{
        BoolRules, CollectionRules, GuidRules, NumberRules, TextRules, TimeRules,
    };
    pub use crate::{PresenceCommands, Settings, Specification, ValidationResult, Validator};
}
