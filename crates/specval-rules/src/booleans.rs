//! Rules for `bool`.

use specval_core::specification::states::{AcceptsRules, RuleOut};
use specval_core::SpecBuilder;

/// Message keys of [`BoolRules`].
pub mod keys {
    /// Value is `true`.
    pub const TRUE: &str = "Bools.True";
    /// Value is `false`.
    pub const FALSE: &str = "Bools.False";
}

/// Boolean rules.
pub trait BoolRules {
    /// Must be `true`.
    #[must_use]
    fn true_value(self) -> SpecBuilder<bool, RuleOut>;
    /// Must be `false`.
    #[must_use]
    fn false_value(self) -> SpecBuilder<bool, RuleOut>;
}

impl<S: AcceptsRules> BoolRules for SpecBuilder<bool, S> {
    fn true_value(self) -> SpecBuilder<bool, RuleOut> {
        self.rule_template(|v: &bool| *v, keys::TRUE, Vec::new())
    }

    fn false_value(self) -> SpecBuilder<bool, RuleOut> {
        self.rule_template(|v: &bool| !*v, keys::FALSE, Vec::new())
    }
}
