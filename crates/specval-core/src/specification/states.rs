//! Builder states.
//!
//! [`SpecBuilder`](super::SpecBuilder) carries one of these zero-sized types
//! to restrict which command may come next:
//!
//! ```text
//! Start ──required──▶ Required ──with_message/..──▶ Message ─▶ ExtraMessage ─▶ Code ─▶ ExtraCode
//!   │  ──optional──▶ Open
//!   │  ──forbidden─▶ Forbidden ──with_message/..──▶ Forbidden* (no further commands)
//!   └─ rule / member / as_* ──▶ RuleOut ──when──▶ Condition ──with_path──▶ Path ─▶ Message ...
//! ```
//!
//! Any state except the forbidden ones accepts a new rule or scope command.

mod sealed {
    pub trait Sealed {}
}

macro_rules! states {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl sealed::Sealed for $name {}
        )*
    };
}

states! {
    /// Nothing appended yet; presence commands are legal.
    Start,
    /// After `required()`.
    Required,
    /// After `optional()` or `with_condition(..)`: only new commands are legal.
    Open,
    /// After `forbidden()`.
    Forbidden,
    /// After a rule or scope command.
    RuleOut,
    /// After `when`.
    Condition,
    /// After `with_path` or `with_name`.
    Path,
    /// After `with_message` or `with_error_cleared`.
    Message,
    /// After `with_extra_message`.
    ExtraMessage,
    /// After `with_code`.
    Code,
    /// After `with_extra_code`.
    ExtraCode,
    /// After `forbidden().with_message(..)`.
    ForbiddenMessage,
    /// After `forbidden()...with_extra_message(..)`.
    ForbiddenExtraMessage,
    /// After `forbidden()...with_code(..)`.
    ForbiddenCode,
    /// After `forbidden()...with_extra_code(..)`.
    ForbiddenExtraCode,
}

/// States after which a rule, scope command, or `with_condition` may follow.
pub trait AcceptsRules: sealed::Sealed {}

/// States accepting `when`.
pub trait AcceptsCondition: sealed::Sealed {}

/// States accepting `with_path` / `with_name`.
pub trait AcceptsPath: sealed::Sealed {}

/// States accepting `with_message` / `with_error_cleared`.
pub trait AcceptsMessage: sealed::Sealed {
    /// State after the call.
    type Next;
}

/// States accepting `with_extra_message`.
pub trait AcceptsExtraMessage: sealed::Sealed {
    /// State after the call.
    type Next;
}

/// States accepting `with_code`.
pub trait AcceptsCode: sealed::Sealed {
    /// State after the call.
    type Next;
}

/// States accepting `with_extra_code`.
pub trait AcceptsExtraCode: sealed::Sealed {
    /// State after the call.
    type Next;
}

macro_rules! accepts {
    ($trait:ident: $($state:ty),*) => {
        $(impl $trait for $state {})*
    };
    ($trait:ident => $next:ty: $($state:ty),*) => {
        $(impl $trait for $state { type Next = $next; })*
    };
}

accepts!(AcceptsRules: Start, Required, Open, RuleOut, Condition, Path, Message, ExtraMessage, Code, ExtraCode);
accepts!(AcceptsCondition: RuleOut);
accepts!(AcceptsPath: RuleOut, Condition);

accepts!(AcceptsMessage => Message: Required, RuleOut, Condition, Path);
accepts!(AcceptsMessage => ForbiddenMessage: Forbidden);

accepts!(AcceptsExtraMessage => ExtraMessage: Required, RuleOut, Condition, Path, Message, ExtraMessage);
accepts!(AcceptsExtraMessage => ForbiddenExtraMessage: Forbidden, ForbiddenMessage, ForbiddenExtraMessage);

accepts!(AcceptsCode => Code: Required, RuleOut, Condition, Path, Message, ExtraMessage);
accepts!(AcceptsCode => ForbiddenCode: Forbidden, ForbiddenMessage, ForbiddenExtraMessage);

accepts!(AcceptsExtraCode => ExtraCode: Required, RuleOut, Condition, Path, Message, ExtraMessage, Code, ExtraCode);
accepts!(AcceptsExtraCode => ForbiddenExtraCode: Forbidden, ForbiddenMessage, ForbiddenExtraMessage, ForbiddenCode, ForbiddenExtraCode);
