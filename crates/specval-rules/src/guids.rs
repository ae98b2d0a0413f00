//! Rules for [`Uuid`].

use specval_core::specification::states::{AcceptsRules, RuleOut};
use specval_core::{Arg, SpecBuilder};
use uuid::Uuid;

/// Message keys of [`GuidRules`].
pub mod keys {
    /// Value is not the nil UUID.
    pub const NOT_NIL: &str = "Guids.NotNil";
    /// Value equals the arg.
    pub const EQUAL_TO: &str = "Guids.EqualTo";
    /// Value differs from the arg.
    pub const NOT_EQUAL_TO: &str = "Guids.NotEqualTo";
}

/// UUID rules.
pub trait GuidRules {
    /// Must not be the nil UUID.
    #[must_use]
    fn not_nil(self) -> SpecBuilder<Uuid, RuleOut>;
    /// Must equal `value`.
    #[must_use]
    fn equal_to_guid(self, value: Uuid) -> SpecBuilder<Uuid, RuleOut>;
    /// Must differ from `value`.
    #[must_use]
    fn not_equal_to_guid(self, value: Uuid) -> SpecBuilder<Uuid, RuleOut>;
}

impl<S: AcceptsRules> GuidRules for SpecBuilder<Uuid, S> {
    fn not_nil(self) -> SpecBuilder<Uuid, RuleOut> {
        self.rule_template(|v: &Uuid| !v.is_nil(), keys::NOT_NIL, Vec::new())
    }

    fn equal_to_guid(self, value: Uuid) -> SpecBuilder<Uuid, RuleOut> {
        self.rule_template(
            move |v: &Uuid| *v == value,
            keys::EQUAL_TO,
            vec![Arg::guid("value", value)],
        )
    }

    fn not_equal_to_guid(self, value: Uuid) -> SpecBuilder<Uuid, RuleOut> {
        self.rule_template(
            move |v: &Uuid| *v != value,
            keys::NOT_EQUAL_TO,
            vec![Arg::guid("value", value)],
        )
    }
}
