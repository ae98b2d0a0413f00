//! Size rules for `Vec<U>`.

use crate::range::check_range;
use specval_core::specification::states::{AcceptsRules, RuleOut};
use specval_core::{Arg, SpecBuilder};

/// Message keys of [`CollectionRules`].
pub mod keys {
    /// Exact item count.
    pub const EXACT_SIZE: &str = "Collections.ExactCollectionSize";
    /// No items.
    pub const EMPTY: &str = "Collections.EmptyCollection";
    /// At least one item.
    pub const NOT_EMPTY: &str = "Collections.NotEmptyCollection";
    /// Minimum item count.
    pub const MIN_SIZE: &str = "Collections.MinCollectionSize";
    /// Maximum item count.
    pub const MAX_SIZE: &str = "Collections.MaxCollectionSize";
    /// Item count range.
    pub const SIZE_BETWEEN: &str = "Collections.CollectionSizeBetween";
}

/// Collection size rules.
pub trait CollectionRules {
    /// Item type.
    type Item: 'static;

    /// Must hold exactly `size` items.
    #[must_use]
    fn exact_collection_size(self, size: usize) -> SpecBuilder<Vec<Self::Item>, RuleOut>;
    /// Must hold no items.
    #[must_use]
    fn empty_collection(self) -> SpecBuilder<Vec<Self::Item>, RuleOut>;
    /// Must hold at least one item.
    #[must_use]
    fn not_empty_collection(self) -> SpecBuilder<Vec<Self::Item>, RuleOut>;
    /// Must hold at least `min` items.
    #[must_use]
    fn min_collection_size(self, min: usize) -> SpecBuilder<Vec<Self::Item>, RuleOut>;
    /// Must hold at most `max` items.
    #[must_use]
    fn max_collection_size(self, max: usize) -> SpecBuilder<Vec<Self::Item>, RuleOut>;
    /// Must hold between `min` and `max` items, both included.
    #[must_use]
    fn collection_size_between(
        self,
        min: usize,
        max: usize,
    ) -> SpecBuilder<Vec<Self::Item>, RuleOut>;
}

impl<U: 'static, S: AcceptsRules> CollectionRules for SpecBuilder<Vec<U>, S> {
    type Item = U;

    fn exact_collection_size(self, size: usize) -> SpecBuilder<Vec<U>, RuleOut> {
        self.rule_template(
            move |v: &Vec<U>| v.len() == size,
            keys::EXACT_SIZE,
            vec![Arg::integer("size", size as u64)],
        )
    }

    fn empty_collection(self) -> SpecBuilder<Vec<U>, RuleOut> {
        self.rule_template(|v: &Vec<U>| v.is_empty(), keys::EMPTY, Vec::new())
    }

    fn not_empty_collection(self) -> SpecBuilder<Vec<U>, RuleOut> {
        self.rule_template(|v: &Vec<U>| !v.is_empty(), keys::NOT_EMPTY, Vec::new())
    }

    fn min_collection_size(self, min: usize) -> SpecBuilder<Vec<U>, RuleOut> {
        self.rule_template(
            move |v: &Vec<U>| v.len() >= min,
            keys::MIN_SIZE,
            vec![Arg::integer("min", min as u64)],
        )
    }

    fn max_collection_size(self, max: usize) -> SpecBuilder<Vec<U>, RuleOut> {
        self.rule_template(
            move |v: &Vec<U>| v.len() <= max,
            keys::MAX_SIZE,
            vec![Arg::integer("max", max as u64)],
        )
    }

    fn collection_size_between(self, min: usize, max: usize) -> SpecBuilder<Vec<U>, RuleOut> {
        let next = self.rule_template(
            move |v: &Vec<U>| (min..=max).contains(&v.len()),
            keys::SIZE_BETWEEN,
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
}
