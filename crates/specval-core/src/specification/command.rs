//! Authored commands, before compilation.

use crate::registry::ErrorDefinition;
use crate::scheme::links::ScopeLink;

pub(crate) type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub(crate) enum Command<T> {
    Required,
    Optional,
    Forbidden,
    Rule {
        predicate: Predicate<T>,
        error: ErrorDefinition,
    },
    WithCondition(Predicate<T>),
    Scope(Box<dyn ScopeLink<T>>),
    When(Predicate<T>),
    WithPath(String),
    WithName(String),
    WithMessage(String),
    WithErrorCleared,
    WithExtraMessage(String),
    WithCode(String),
    WithExtraCode(String),
}

impl<T> Command<T> {
    /// Parameter commands modify the command before them.
    pub(crate) fn is_parameter(&self) -> bool {
        matches!(
            self,
            Self::When(_)
                | Self::WithPath(_)
                | Self::WithName(_)
                | Self::WithMessage(_)
                | Self::WithErrorCleared
                | Self::WithExtraMessage(_)
                | Self::WithCode(_)
                | Self::WithExtraCode(_)
        )
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Required => "Required",
            Self::Optional => "Optional",
            Self::Forbidden => "Forbidden",
            Self::Rule { .. } => "Rule",
            Self::WithCondition(_) => "WithCondition",
            Self::Scope(link) => link.kind().label(),
            Self::When(_) => "When",
            Self::WithPath(_) => "WithPath",
            Self::WithName(_) => "WithName",
            Self::WithMessage(_) => "WithMessage",
            Self::WithErrorCleared => "WithErrorCleared",
            Self::WithExtraMessage(_) => "WithExtraMessage",
            Self::WithCode(_) => "WithCode",
            Self::WithExtraCode(_) => "WithExtraCode",
        }
    }
}
