//! Compiled scopes.

use super::links::{LinkKind, Transition};
use super::ScopeId;
use crate::registry::ErrorId;
use crate::specification::command::Predicate;

/// What happens when a scope receives a null value, or any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Required(Option<ErrorId>),
    Optional,
    Forbidden(Option<ErrorId>),
}

impl Presence {
    pub(crate) fn error(self) -> Option<ErrorId> {
        match self {
            Self::Required(error) | Self::Forbidden(error) => error,
            Self::Optional => None,
        }
    }
}

/// How errors found inside a nested scope surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorMode {
    /// Nested errors are recorded as they are.
    Nested,
    /// Nested errors are suppressed; one error is recorded at the link's
    /// path if any was found.
    Override(Option<ErrorId>),
    /// Nested errors are recorded, followed by this one if any was found.
    Append(ErrorId),
}

pub(crate) struct RuleStep<T> {
    pub(crate) condition: Option<Predicate<T>>,
    pub(crate) predicate: Predicate<T>,
    pub(crate) error: Option<ErrorId>,
    pub(crate) path: Option<String>,
}

pub(crate) struct LinkStep<T> {
    pub(crate) condition: Option<Predicate<T>>,
    pub(crate) transition: Box<dyn Transition<T>>,
    pub(crate) path: Option<String>,
    pub(crate) mode: ErrorMode,
}

pub(crate) enum Step<T> {
    /// `with_condition`: a false result ends the scope invocation.
    Guard(Predicate<T>),
    Rule(RuleStep<T>),
    Link(LinkStep<T>),
}

pub(crate) struct CompiledScope<T> {
    pub(crate) presence: Presence,
    pub(crate) null_check: Option<Predicate<T>>,
    pub(crate) steps: Vec<Step<T>>,
}

impl<T> CompiledScope<T> {
    /// True for values the scope's type treats as null (`None` of an
    /// `Option` scope).
    pub(crate) fn is_null(&self, value: &T) -> bool {
        self.null_check.as_ref().is_some_and(|check| check(value))
    }
}

/// Type-erased shape of a scope, used for the static walk over the graph.
#[derive(Debug, Clone)]
pub(crate) struct ScopeOutline {
    pub(crate) type_name: &'static str,
    pub(crate) presence: Presence,
    pub(crate) items: Vec<OutlineItem>,
}

#[derive(Debug, Clone)]
pub(crate) enum OutlineItem {
    Rule {
        error: Option<ErrorId>,
        path: Option<String>,
    },
    Link {
        kind: LinkKind,
        target: ScopeId,
        path: Option<String>,
        mode: ErrorMode,
    },
}
