//! Rules for `String` values.

use crate::range::check_range;
use once_cell::sync::Lazy;
use regex::Regex;
use specval_core::specification::states::{AcceptsRules, RuleOut};
use specval_core::{Arg, AuthoringIssue, SpecBuilder};
use tracing::debug;

#[allow(clippy::expect_used)]
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)*$").expect("email pattern is valid")
});

/// Message keys of [`TextRules`].
pub mod keys {
    /// Value equals the arg.
    pub const EQUAL_TO: &str = "Texts.EqualTo";
    /// Value differs from the arg.
    pub const NOT_EQUAL_TO: &str = "Texts.NotEqualTo";
    /// Value contains the arg.
    pub const CONTAINS: &str = "Texts.Contains";
    /// Value does not contain the arg.
    pub const NOT_CONTAINS: &str = "Texts.NotContains";
    /// Value starts with the arg.
    pub const STARTS_WITH: &str = "Texts.StartsWith";
    /// Value ends with the arg.
    pub const ENDS_WITH: &str = "Texts.EndsWith";
    /// Value is not empty.
    pub const NOT_EMPTY: &str = "Texts.NotEmpty";
    /// Value has a non-whitespace character.
    pub const NOT_WHITE_SPACE: &str = "Texts.NotWhiteSpace";
    /// Value has no line breaks.
    pub const SINGLE_LINE: &str = "Texts.SingleLine";
    /// Exact length in characters.
    pub const EXACT_LENGTH: &str = "Texts.ExactLength";
    /// Minimum length in characters.
    pub const MIN_LENGTH: &str = "Texts.MinLength";
    /// Maximum length in characters.
    pub const MAX_LENGTH: &str = "Texts.MaxLength";
    /// Length range in characters.
    pub const LENGTH_BETWEEN: &str = "Texts.LengthBetween";
    /// Regex match.
    pub const MATCHES: &str = "Texts.Matches";
    /// Email address shape.
    pub const EMAIL: &str = "Texts.Email";
}

/// Text rules. Lengths count `char`s.
pub trait TextRules {
    /// Must equal `value`.
    #[must_use]
    fn equal_to(self, value: &str) -> SpecBuilder<String, RuleOut>;
    /// Must differ from `value`.
    #[must_use]
    fn not_equal_to(self, value: &str) -> SpecBuilder<String, RuleOut>;
    /// Must contain `value`.
    #[must_use]
    fn contains(self, value: &str) -> SpecBuilder<String, RuleOut>;
    /// Must not contain `value`.
    #[must_use]
    fn not_contains(self, value: &str) -> SpecBuilder<String, RuleOut>;
    /// Must start with `value`.
    #[must_use]
    fn starts_with(self, value: &str) -> SpecBuilder<String, RuleOut>;
    /// Must end with `value`.
    #[must_use]
    fn ends_with(self, value: &str) -> SpecBuilder<String, RuleOut>;
    /// Must not be empty.
    #[must_use]
    fn not_empty(self) -> SpecBuilder<String, RuleOut>;
    /// Must contain a non-whitespace character.
    #[must_use]
    fn not_white_space(self) -> SpecBuilder<String, RuleOut>;
    /// Must not contain line breaks.
    #[must_use]
    fn single_line(self) -> SpecBuilder<String, RuleOut>;
    /// Must be exactly `length` characters long.
    #[must_use]
    fn exact_length(self, length: usize) -> SpecBuilder<String, RuleOut>;
    /// Must be at least `min` characters long.
    #[must_use]
    fn min_length(self, min: usize) -> SpecBuilder<String, RuleOut>;
    /// Must be at most `max` characters long.
    #[must_use]
    fn max_length(self, max: usize) -> SpecBuilder<String, RuleOut>;
    /// Must be between `min` and `max` characters long, both included.
    #[must_use]
    fn length_between(self, min: usize, max: usize) -> SpecBuilder<String, RuleOut>;
    /// Must match `pattern`.
    #[must_use]
    fn matches(self, pattern: &str) -> SpecBuilder<String, RuleOut>;
    /// Must look like an email address.
    #[must_use]
    fn email(self) -> SpecBuilder<String, RuleOut>;
}

impl<S: AcceptsRules> TextRules for SpecBuilder<String, S> {
    fn equal_to(self, value: &str) -> SpecBuilder<String, RuleOut> {
        let expected = value.to_string();
        self.rule_template(
            move |v: &String| *v == expected,
            keys::EQUAL_TO,
            vec![Arg::text("value", value)],
        )
    }

    fn not_equal_to(self, value: &str) -> SpecBuilder<String, RuleOut> {
        let unexpected = value.to_string();
        self.rule_template(
            move |v: &String| *v != unexpected,
            keys::NOT_EQUAL_TO,
            vec![Arg::text("value", value)],
        )
    }

    fn contains(self, value: &str) -> SpecBuilder<String, RuleOut> {
        let part = value.to_string();
        self.rule_template(
            move |v: &String| v.contains(part.as_str()),
            keys::CONTAINS,
            vec![Arg::text("value", value)],
        )
    }

    fn not_contains(self, value: &str) -> SpecBuilder<String, RuleOut> {
        let part = value.to_string();
        self.rule_template(
            move |v: &String| !v.contains(part.as_str()),
            keys::NOT_CONTAINS,
            vec![Arg::text("value", value)],
        )
    }

    fn starts_with(self, value: &str) -> SpecBuilder<String, RuleOut> {
        let prefix = value.to_string();
        self.rule_template(
            move |v: &String| v.starts_with(prefix.as_str()),
            keys::STARTS_WITH,
            vec![Arg::text("value", value)],
        )
    }

    fn ends_with(self, value: &str) -> SpecBuilder<String, RuleOut> {
        let suffix = value.to_string();
        self.rule_template(
            move |v: &String| v.ends_with(suffix.as_str()),
            keys::ENDS_WITH,
            vec![Arg::text("value", value)],
        )
    }

    fn not_empty(self) -> SpecBuilder<String, RuleOut> {
        self.rule_template(|v: &String| !v.is_empty(), keys::NOT_EMPTY, Vec::new())
    }

    fn not_white_space(self) -> SpecBuilder<String, RuleOut> {
        self.rule_template(
            |v: &String| v.chars().any(|c| !c.is_whitespace()),
            keys::NOT_WHITE_SPACE,
            Vec::new(),
        )
    }

    fn single_line(self) -> SpecBuilder<String, RuleOut> {
        self.rule_template(
            |v: &String| !v.contains(['\n', '\r']),
            keys::SINGLE_LINE,
            Vec::new(),
        )
    }

    fn exact_length(self, length: usize) -> SpecBuilder<String, RuleOut> {
        self.rule_template(
            move |v: &String| v.chars().count() == length,
            keys::EXACT_LENGTH,
            vec![Arg::integer("length", length as u64)],
        )
    }

    fn min_length(self, min: usize) -> SpecBuilder<String, RuleOut> {
        self.rule_template(
            move |v: &String| v.chars().count() >= min,
            keys::MIN_LENGTH,
            vec![Arg::integer("min", min as u64)],
        )
    }

    fn max_length(self, max: usize) -> SpecBuilder<String, RuleOut> {
        self.rule_template(
            move |v: &String| v.chars().count() <= max,
            keys::MAX_LENGTH,
            vec![Arg::integer("max", max as u64)],
        )
    }

    fn length_between(self, min: usize, max: usize) -> SpecBuilder<String, RuleOut> {
        let next = self.rule_template(
            move |v: &String| (min..=max).contains(&v.chars().count()),
            keys::LENGTH_BETWEEN,
            vec![
                Arg::integer("min", min as u64),
                Arg::integer("max", max as u64),
            ],
        );
        match check_range(&min, &max, true) {
            Some(issue) => next.report(issue),
            None => next,
        }
    }

    fn matches(self, pattern: &str) -> SpecBuilder<String, RuleOut> {
        let args = vec![Arg::text("pattern", pattern)];
        match Regex::new(pattern) {
            Ok(regex) => {
                self.rule_template(move |v: &String| regex.is_match(v), keys::MATCHES, args)
            }
            Err(e) => {
                debug!(pattern, error = %e, "Rejected regex pattern");
                self.rule_template(|_: &String| false, keys::MATCHES, args)
                    .report(AuthoringIssue::InvalidArgument {
                        name: "pattern".to_string(),
                        reason: e.to_string(),
                    })
            }
        }
    }

    fn email(self) -> SpecBuilder<String, RuleOut> {
        self.rule_template(|v: &String| EMAIL_REGEX.is_match(v), keys::EMAIL, Vec::new())
    }
}
