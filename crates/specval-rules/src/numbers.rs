//! Rules for primitive numbers.
//!
//! Comparisons against `NaN` are false, so every rule except
//! [`not_equal_to`](NumberRules::not_equal_to) rejects a `NaN` value.

use crate::range::check_range;
use specval_core::specification::states::{AcceptsRules, RuleOut};
use specval_core::{Arg, SpecBuilder};
use std::fmt::Display;

/// Message keys of [`NumberRules`].
pub mod keys {
    /// Value equals the arg.
    pub const EQUAL_TO: &str = "Numbers.EqualTo";
    /// Value differs from the arg.
    pub const NOT_EQUAL_TO: &str = "Numbers.NotEqualTo";
    /// Value is above `min`.
    pub const GREATER_THAN: &str = "Numbers.GreaterThan";
    /// Value is at least `min`.
    pub const GREATER_THAN_OR_EQUAL_TO: &str = "Numbers.GreaterThanOrEqualTo";
    /// Value is below `max`.
    pub const LESS_THAN: &str = "Numbers.LessThan";
    /// Value is at most `max`.
    pub const LESS_THAN_OR_EQUAL_TO: &str = "Numbers.LessThanOrEqualTo";
    /// Exclusive range.
    pub const BETWEEN: &str = "Numbers.Between";
    /// Inclusive range.
    pub const BETWEEN_OR_EQUAL_TO: &str = "Numbers.BetweenOrEqualTo";
    /// Value is not zero.
    pub const NON_ZERO: &str = "Numbers.NonZero";
    /// Value is above zero.
    pub const POSITIVE: &str = "Numbers.Positive";
    /// Value is at most zero.
    pub const NON_POSITIVE: &str = "Numbers.NonPositive";
    /// Value is below zero.
    pub const NEGATIVE: &str = "Numbers.Negative";
    /// Value is at least zero.
    pub const NON_NEGATIVE: &str = "Numbers.NonNegative";
    /// Value is not `NaN`.
    pub const NON_NAN: &str = "Numbers.NonNaN";
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive number usable with [`NumberRules`].
pub trait Number: Copy + PartialOrd + Display + Send + Sync + 'static + sealed::Sealed {
    /// Additive identity.
    const ZERO: Self;

    /// Wraps `self` as a rule arg.
    fn to_arg(self, name: &str) -> Arg;

    /// True for `NaN`; always false for integers.
    fn is_nan(self) -> bool {
        false
    }
}

macro_rules! integers {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Number for $ty {
                const ZERO: Self = 0;

                fn to_arg(self, name: &str) -> Arg {
                    Arg::integer(name, self)
                }
            }
        )*
    };
}

integers!(i8, i16, i32, i64, u8, u16, u32, u64);

impl sealed::Sealed for isize {}

impl Number for isize {
    const ZERO: Self = 0;

    fn to_arg(self, name: &str) -> Arg {
        Arg::integer(name, self as i64)
    }
}

impl sealed::Sealed for usize {}

impl Number for usize {
    const ZERO: Self = 0;

    fn to_arg(self, name: &str) -> Arg {
        Arg::integer(name, self as u64)
    }
}

macro_rules! floats {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Number for $ty {
                const ZERO: Self = 0.0;

                fn to_arg(self, name: &str) -> Arg {
                    Arg::float(name, self)
                }

                fn is_nan(self) -> bool {
                    <$ty>::is_nan(self)
                }
            }
        )*
    };
}

floats!(f32, f64);

/// Number rules, available on every [`Number`] type.
///
/// ```
/// use specval_core::{Specification, Validator};
/// use specval_rules::NumberRules;
///
/// let spec = Specification::<i32>::new(|s| s.between(0, 10));
/// let validator = Validator::new(&spec).unwrap();
/// assert!(validator.is_valid(&5).unwrap());
/// assert!(!validator.is_valid(&10).unwrap());
/// ```
pub trait NumberRules {
    /// The number type.
    type Value: Number;

    /// Must equal `value`.
    #[must_use]
    fn equal_to(self, value: Self::Value) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must differ from `value`.
    #[must_use]
    fn not_equal_to(self, value: Self::Value) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must be greater than `min`.
    #[must_use]
    fn greater_than(self, min: Self::Value) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must be greater than or equal to `min`.
    #[must_use]
    fn greater_than_or_equal_to(self, min: Self::Value) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must be less than `max`.
    #[must_use]
    fn less_than(self, max: Self::Value) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must be less than or equal to `max`.
    #[must_use]
    fn less_than_or_equal_to(self, max: Self::Value) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must lie strictly between `min` and `max`.
    #[must_use]
    fn between(self, min: Self::Value, max: Self::Value) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must lie between `min` and `max`, both included.
    #[must_use]
    fn between_or_equal_to(
        self,
        min: Self::Value,
        max: Self::Value,
    ) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must not be zero.
    #[must_use]
    fn non_zero(self) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must be greater than zero.
    #[must_use]
    fn positive(self) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must not be greater than zero.
    #[must_use]
    fn non_positive(self) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must be less than zero.
    #[must_use]
    fn negative(self) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must not be less than zero.
    #[must_use]
    fn non_negative(self) -> SpecBuilder<Self::Value, RuleOut>;
    /// Must not be `NaN`.
    #[must_use]
    fn non_nan(self) -> SpecBuilder<Self::Value, RuleOut>;
}

impl<N: Number, S: AcceptsRules> NumberRules for SpecBuilder<N, S> {
    type Value = N;

    fn equal_to(self, value: N) -> SpecBuilder<N, RuleOut> {
        self.rule_template(move |v: &N| *v == value, keys::EQUAL_TO, vec![value.to_arg("value")])
    }

    fn not_equal_to(self, value: N) -> SpecBuilder<N, RuleOut> {
        self.rule_template(
            move |v: &N| *v != value,
            keys::NOT_EQUAL_TO,
            vec![value.to_arg("value")],
        )
    }

    fn greater_than(self, min: N) -> SpecBuilder<N, RuleOut> {
        self.rule_template(move |v: &N| *v > min, keys::GREATER_THAN, vec![min.to_arg("min")])
    }

    fn greater_than_or_equal_to(self, min: N) -> SpecBuilder<N, RuleOut> {
        self.rule_template(
            move |v: &N| *v >= min,
            keys::GREATER_THAN_OR_EQUAL_TO,
            vec![min.to_arg("min")],
        )
    }

    fn less_than(self, max: N) -> SpecBuilder<N, RuleOut> {
        self.rule_template(move |v: &N| *v < max, keys::LESS_THAN, vec![max.to_arg("max")])
    }

    fn less_than_or_equal_to(self, max: N) -> SpecBuilder<N, RuleOut> {
        self.rule_template(
            move |v: &N| *v <= max,
            keys::LESS_THAN_OR_EQUAL_TO,
            vec![max.to_arg("max")],
        )
    }

    fn between(self, min: N, max: N) -> SpecBuilder<N, RuleOut> {
        let next = self.rule_template(
            move |v: &N| *v > min && *v < max,
            keys::BETWEEN,
            vec![min.to_arg("min"), max.to_arg("max")],
        );
        match check_range(&min, &max, false) {
            Some(issue) => next.report(issue),
            None => next,
        }
    }

    fn between_or_equal_to(self, min: N, max: N) -> SpecBuilder<N, RuleOut> {
        let next = self.rule_template(
            move |v: &N| *v >= min && *v <= max,
            keys::BETWEEN_OR_EQUAL_TO,
            vec![min.to_arg("min"), max.to_arg("max")],
        );
        match check_range(&min, &max, true) {
            Some(issue) => next.report(issue),
            None => next,
        }
    }

    fn non_zero(self) -> SpecBuilder<N, RuleOut> {
        self.rule_template(
            |v: &N| !v.is_nan() && *v != N::ZERO,
            keys::NON_ZERO,
            Vec::new(),
        )
    }

    fn positive(self) -> SpecBuilder<N, RuleOut> {
        self.rule_template(|v: &N| *v > N::ZERO, keys::POSITIVE, Vec::new())
    }

    fn non_positive(self) -> SpecBuilder<N, RuleOut> {
        self.rule_template(|v: &N| *v <= N::ZERO, keys::NON_POSITIVE, Vec::new())
    }

    fn negative(self) -> SpecBuilder<N, RuleOut> {
        self.rule_template(|v: &N| *v < N::ZERO, keys::NEGATIVE, Vec::new())
    }

    fn non_negative(self) -> SpecBuilder<N, RuleOut> {
        self.rule_template(|v: &N| *v >= N::ZERO, keys::NON_NEGATIVE, Vec::new())
    }

    fn non_nan(self) -> SpecBuilder<N, RuleOut> {
        self.rule_template(|v: &N| !v.is_nan(), keys::NON_NAN, Vec::new())
    }
}
