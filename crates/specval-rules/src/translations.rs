//! English messages for every built-in rule.

use crate::{booleans, collections, guids, numbers, texts, times};
use specval_core::translation::CORE_ENGLISH;
use specval_core::{Translations, ENGLISH};

/// Message templates of the built-in rules, keyed by message key.
pub const ENGLISH_RULES: [(&str, &str); 43] = [
    (texts::keys::EQUAL_TO, "Must be equal to '{value}'"),
    (texts::keys::NOT_EQUAL_TO, "Must not be equal to '{value}'"),
    (texts::keys::CONTAINS, "Must contain '{value}'"),
    (texts::keys::NOT_CONTAINS, "Must not contain '{value}'"),
    (texts::keys::STARTS_WITH, "Must start with '{value}'"),
    (texts::keys::ENDS_WITH, "Must end with '{value}'"),
    (texts::keys::NOT_EMPTY, "Must not be empty"),
    (
        texts::keys::NOT_WHITE_SPACE,
        "Must not consist only of whitespace characters",
    ),
    (texts::keys::SINGLE_LINE, "Must consist of single line"),
    (
        texts::keys::EXACT_LENGTH,
        "Must be exactly {length} characters in length",
    ),
    (
        texts::keys::MIN_LENGTH,
        "Must be at least {min} characters in length",
    ),
    (
        texts::keys::MAX_LENGTH,
        "Must be at most {max} characters in length",
    ),
    (
        texts::keys::LENGTH_BETWEEN,
        "Must be between {min} and {max} characters in length",
    ),
    (texts::keys::MATCHES, "Must match RegEx pattern '{pattern}'"),
    (texts::keys::EMAIL, "Must be a valid email address"),
    (numbers::keys::EQUAL_TO, "Must be equal to {value}"),
    (numbers::keys::NOT_EQUAL_TO, "Must not be equal to {value}"),
    (numbers::keys::GREATER_THAN, "Must be greater than {min}"),
    (
        numbers::keys::GREATER_THAN_OR_EQUAL_TO,
        "Must be greater than or equal to {min}",
    ),
    (numbers::keys::LESS_THAN, "Must be less than {max}"),
    (
        numbers::keys::LESS_THAN_OR_EQUAL_TO,
        "Must be less than or equal to {max}",
    ),
    (
        numbers::keys::BETWEEN,
        "Must be between {min} and {max} (exclusive)",
    ),
    (
        numbers::keys::BETWEEN_OR_EQUAL_TO,
        "Must be between {min} and {max} (inclusive)",
    ),
    (numbers::keys::NON_ZERO, "Must not be zero"),
    (numbers::keys::POSITIVE, "Must be positive"),
    (numbers::keys::NON_POSITIVE, "Must not be positive"),
    (numbers::keys::NEGATIVE, "Must be negative"),
    (numbers::keys::NON_NEGATIVE, "Must not be negative"),
    (numbers::keys::NON_NAN, "Must be a number"),
    (
        collections::keys::EXACT_SIZE,
        "Must contain exactly {size} items",
    ),
    (collections::keys::EMPTY, "Must be empty"),
    (collections::keys::NOT_EMPTY, "Must not be empty"),
    (collections::keys::MIN_SIZE, "Must contain at least {min} items"),
    (collections::keys::MAX_SIZE, "Must contain at most {max} items"),
    (
        collections::keys::SIZE_BETWEEN,
        "Must contain between {min} and {max} items",
    ),
    (booleans::keys::TRUE, "Must be true"),
    (booleans::keys::FALSE, "Must be false"),
    (guids::keys::NOT_NIL, "Must not be nil"),
    (guids::keys::EQUAL_TO, "Must be equal to {value}"),
    (guids::keys::NOT_EQUAL_TO, "Must not be equal to {value}"),
    (times::keys::AFTER, "Must be after {min}"),
    (times::keys::BEFORE, "Must be before {max}"),
    (times::keys::BETWEEN, "Must be between {min} and {max}"),
];

/// The English translation: engine entries plus every rule message.
#[must_use]
pub fn english() -> Translations {
    Translations::new().with(ENGLISH, CORE_ENGLISH.into_iter().chain(ENGLISH_RULES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = ENGLISH_RULES.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), ENGLISH_RULES.len());
    }

    #[test]
    fn english_includes_engine_entries() {
        let english = english();
        let table = english.get(ENGLISH).expect("english table");
        assert_eq!(table["Global.Required"], "Required");
        assert_eq!(table["Texts.Email"], "Must be a valid email address");
        assert_eq!(table.len(), CORE_ENGLISH.len() + ENGLISH_RULES.len());
    }

    #[test]
    fn every_key_is_namespaced() {
        for (key, template) in ENGLISH_RULES {
            assert!(key.contains('.'), "{key}");
            assert!(!template.is_empty(), "{key}");
        }
    }
}
