//! # specval-rules
//!
//! Built-in rules for specval.
//!
//! Every rule is an extension method on [`SpecBuilder`](specval_core::SpecBuilder)
//! that appends a predicate with a message key and typed args. The English
//! templates for those keys live in [`translations::english`].
//!
//! ## Available Rules
//!
//! | Trait | Value type | Rules |
//! |-------|------------|-------|
//! | [`TextRules`] | `String` | `equal_to`, `contains`, `starts_with`, `min_length`, `matches`, `email`, ... |
//! | [`NumberRules`] | integers, `f32`, `f64` | `greater_than`, `between`, `positive`, `non_nan`, ... |
//! | [`CollectionRules`] | `Vec<U>` | `exact_collection_size`, `not_empty_collection`, ... |
//! | [`BoolRules`] | `bool` | `true_value`, `false_value` |
//! | [`GuidRules`] | `Uuid` | `not_nil`, `equal_to_guid`, `not_equal_to_guid` |
//! | [`TimeRules`] | `DateTime<Utc>` | `after`, `before`, `between_times` |
//!
//! ## Usage
//!
//! ```
//! use specval_core::{Settings, Specification, Validator, ENGLISH};
//! use specval_rules::{translations, TextRules};
//!
//! let spec = Specification::<String>::new(|s| s.not_empty().and().max_length(5));
//! let settings = Settings::new().with_translation(ENGLISH, translations::ENGLISH_RULES);
//! let validator = Validator::with_settings(&spec, settings).unwrap();
//!
//! let result = validator.validate(&"too long".to_string()).unwrap();
//! assert_eq!(result.to_string(), "Must be at most 5 characters in length");
//! ```
//!
//! Bounds in the wrong order (`length_between(5, 1)`) are reported when the
//! validator is built.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod range;

pub mod booleans;
pub mod collections;
pub mod guids;
pub mod numbers;
pub mod texts;
pub mod times;
pub mod translations;

pub use booleans::BoolRules;
pub use collections::CollectionRules;
pub use guids::GuidRules;
pub use numbers::{Number, NumberRules};
pub use texts::TextRules;
pub use times::TimeRules;
