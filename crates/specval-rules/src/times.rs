//! Rules for UTC timestamps.

use crate::range::check_range;
use chrono::{DateTime, Utc};
use specval_core::specification::states::{AcceptsRules, RuleOut};
use specval_core::{Arg, SpecBuilder};

/// Message keys of [`TimeRules`].
pub mod keys {
    /// Value is later than `min`.
    pub const AFTER: &str = "Times.After";
    /// Value is earlier than `max`.
    pub const BEFORE: &str = "Times.Before";
    /// Value is strictly between `min` and `max`.
    pub const BETWEEN: &str = "Times.BetweenTimes";
}

/// Timestamp rules. Bounds are exclusive.
pub trait TimeRules {
    /// Must be later than `min`.
    #[must_use]
    fn after(self, min: DateTime<Utc>) -> SpecBuilder<DateTime<Utc>, RuleOut>;
    /// Must be earlier than `max`.
    #[must_use]
    fn before(self, max: DateTime<Utc>) -> SpecBuilder<DateTime<Utc>, RuleOut>;
    /// Must be later than `min` and earlier than `max`.
    #[must_use]
    fn between_times(
        self,
        min: DateTime<Utc>,
        max: DateTime<Utc>,
    ) -> SpecBuilder<DateTime<Utc>, RuleOut>;
}

impl<S: AcceptsRules> TimeRules for SpecBuilder<DateTime<Utc>, S> {
    fn after(self, min: DateTime<Utc>) -> SpecBuilder<DateTime<Utc>, RuleOut> {
        self.rule_template(
            move |v: &DateTime<Utc>| *v > min,
            keys::AFTER,
            vec![Arg::time("min", &min)],
        )
    }

    fn before(self, max: DateTime<Utc>) -> SpecBuilder<DateTime<Utc>, RuleOut> {
        self.rule_template(
            move |v: &DateTime<Utc>| *v < max,
            keys::BEFORE,
            vec![Arg::time("max", &max)],
        )
    }

    fn between_times(
        self,
        min: DateTime<Utc>,
        max: DateTime<Utc>,
    ) -> SpecBuilder<DateTime<Utc>, RuleOut> {
        let next = self.rule_template(
            move |v: &DateTime<Utc>| *v > min && *v < max,
            keys::BETWEEN,
            vec![Arg::time("min", &min), Arg::time("max", &max)],
        );
        match check_range(&min, &max, false) {
            Some(issue) => next.report(issue),
            None => next,
        }
    }
}
