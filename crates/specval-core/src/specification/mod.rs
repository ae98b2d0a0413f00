//! Specification authoring.
//!
//! A [`Specification`] wraps a builder function producing the ordered command
//! list for one value type. Specifications reference each other through scope
//! commands (`member`, `as_collection`, ...); the graph may be recursive when
//! built with [`Specification::deferred`].

mod builder;
pub(crate) mod command;
pub mod states;

pub use builder::{PresenceCommands, SpecBuilder, ERROR_KEY};

use crate::error::{DefinitionError, LocatedIssue};
use command::{Command, Predicate};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SPEC_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a specification, shared by its clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecId(u64);

impl SpecId {
    fn next() -> Self {
        Self(NEXT_SPEC_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commands and issues produced by one run of a builder function.
pub(crate) struct Draft<T> {
    pub(crate) commands: Vec<Command<T>>,
    pub(crate) issues: Vec<LocatedIssue>,
    /// Tells which values count as null, for types with a null value.
    pub(crate) null_check: Option<Predicate<T>>,
}

type Body<T> = dyn Fn(SpecBuilder<T>) -> Draft<T> + Send + Sync;

struct Inner<T> {
    id: SpecId,
    body: OnceCell<Box<Body<T>>>,
}

/// Declarative description of the constraints on values of type `T`.
///
/// Cloning is cheap and keeps the identity: the compiler builds each
/// specification once, no matter how many scope commands reference it.
///
/// # Example
///
/// ```
/// use specval_core::Specification;
///
/// struct User {
///     name: String,
/// }
///
/// let name = Specification::<String>::new(|s| s.rule(|v| !v.is_empty()));
/// let user = Specification::<User>::new(move |s| s.member("Name", |u| &u.name, name.clone()));
/// # let _ = user;
/// ```
pub struct Specification<T> {
    inner: Arc<Inner<T>>,
}

impl<T: 'static> Specification<T> {
    /// Creates a specification from its builder function.
    #[must_use]
    pub fn new<S, F>(build: F) -> Self
    where
        F: Fn(SpecBuilder<T>) -> SpecBuilder<T, S> + Send + Sync + 'static,
    {
        let spec = Self::deferred();
        // a fresh cell cannot be occupied
        let _ = spec.inner.body.set(wrap(build));
        spec
    }

    /// Creates a specification whose body is provided later with
    /// [`define`](Self::define).
    ///
    /// This is how recursive graphs are built: clone the deferred handle
    /// into the specifications that reference it, then define it.
    ///
    /// ```
    /// use specval_core::{PresenceCommands, Specification};
    ///
    /// struct Node {
    ///     next: Option<Box<Node>>,
    /// }
    ///
    /// let node = Specification::<Node>::deferred();
    /// let inner = node.clone();
    /// node.define(move |s| {
    ///     s.optional()
    ///         .member_optional("Next", |n| n.next.as_deref(), inner.clone())
    /// })
    /// .unwrap();
    /// ```
    #[must_use]
    pub fn deferred() -> Self {
        Self {
            inner: Arc::new(Inner {
                id: SpecId::next(),
                body: OnceCell::new(),
            }),
        }
    }

    /// Binds the body of a deferred specification.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::AlreadyDefined`] if a body is already bound.
    pub fn define<S, F>(&self, build: F) -> Result<(), DefinitionError>
    where
        F: Fn(SpecBuilder<T>) -> SpecBuilder<T, S> + Send + Sync + 'static,
    {
        self.inner
            .body
            .set(wrap(build))
            .map_err(|_| DefinitionError::AlreadyDefined {
                id: self.inner.id.get(),
            })
    }

    /// Returns the identity shared by all clones.
    #[must_use]
    pub fn id(&self) -> SpecId {
        self.inner.id
    }

    /// True once a body is bound.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.inner.body.get().is_some()
    }

    /// Runs the builder function on an empty builder.
    pub(crate) fn draft(&self) -> Option<Draft<T>> {
        self.inner
            .body
            .get()
            .map(|body| body(SpecBuilder::new()))
    }
}

fn wrap<T, S, F>(build: F) -> Box<Body<T>>
where
    T: 'static,
    F: Fn(SpecBuilder<T>) -> SpecBuilder<T, S> + Send + Sync + 'static,
{
    Box::new(move |builder| build(builder).into_draft())
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("id", &self.inner.id)
            .field("type", &std::any::type_name::<T>())
            .field("defined", &self.inner.body.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DefinitionError;

    #[test]
    fn clones_share_identity() {
        let spec = Specification::<u32>::new(|s| s.rule(|v| *v > 0));
        let copy = spec.clone();
        assert_eq!(spec.id(), copy.id());
        assert_ne!(spec.id(), Specification::<u32>::new(|s| s).id());
    }

    #[test]
    fn deferred_defines_once() {
        let spec = Specification::<u32>::deferred();
        assert!(!spec.is_defined());
        assert!(spec.draft().is_none());

        spec.define(|s| s.rule(|v| *v > 0)).unwrap();
        assert!(spec.is_defined());
        assert!(matches!(
            spec.define(|s| s),
            Err(DefinitionError::AlreadyDefined { .. })
        ));
    }

    #[test]
    fn draft_reruns_builder() {
        let spec = Specification::<u32>::new(|s| s.rule(|v| *v > 0).rule(|v| *v < 10));
        assert_eq!(spec.draft().map(|d| d.commands.len()), Some(2));
        assert_eq!(spec.draft().map(|d| d.commands.len()), Some(2));
    }
}
