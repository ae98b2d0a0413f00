//! Compiled form of a specification graph.
//!
//! [`ModelScheme::build`] turns the root [`Specification`] and everything it
//! references into one scope per distinct specification, registers every
//! error definition once, and precomputes the template error map, the
//! relative path cache and whether the graph can loop.

pub(crate) mod factory;
pub(crate) mod links;
pub(crate) mod scope;

pub use links::LinkKind;

use crate::error::{SchemeError, ValidationError};
use crate::registry::{ErrorRegistry, ErrorsMap};
use crate::specification::Specification;
use scope::CompiledScope;
use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Index of a compiled scope inside its scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub(crate) usize);

impl ScopeId {
    /// Returns the raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Immutable, thread-safe result of compiling a specification graph.
pub struct ModelScheme {
    pub(crate) root: ScopeId,
    pub(crate) root_type: &'static str,
    pub(crate) scopes: Vec<Box<dyn Any + Send + Sync>>,
    pub(crate) scope_types: Vec<&'static str>,
    pub(crate) registry: ErrorRegistry,
    pub(crate) template: ErrorsMap,
    pub(crate) paths: HashMap<String, HashMap<String, String>>,
    pub(crate) reference_loop_possible: bool,
}

impl ModelScheme {
    /// Compiles `root` and every specification reachable from it.
    ///
    /// # Errors
    ///
    /// - [`SchemeError::InvalidSpecification`] with every authoring issue found;
    /// - [`SchemeError::UndefinedSpecification`] for a deferred specification
    ///   that was never defined.
    pub fn build<T: 'static>(root: &Specification<T>) -> Result<Self, SchemeError> {
        factory::SchemeFactory::build(root)
    }

    /// Id of the root scope.
    #[must_use]
    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// Type validated by the root scope.
    #[must_use]
    pub fn root_type(&self) -> &'static str {
        self.root_type
    }

    /// Number of distinct scopes.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Type validated by a scope.
    #[must_use]
    pub fn scope_type(&self, id: ScopeId) -> Option<&'static str> {
        self.scope_types.get(id.0).copied()
    }

    /// All error definitions the scheme can record.
    #[must_use]
    pub fn registry(&self) -> &ErrorRegistry {
        &self.registry
    }

    /// Every error that could be recorded, at its generic path.
    #[must_use]
    pub fn template(&self) -> &ErrorsMap {
        &self.template
    }

    /// True if some scope can be re-entered through a chain of non-converting
    /// scope commands.
    #[must_use]
    pub fn is_reference_loop_possible(&self) -> bool {
        self.reference_loop_possible
    }

    /// Resolves `relative` against `base`, using the paths precomputed at
    /// compile time when available.
    #[must_use]
    pub fn resolve_path(&self, base: &str, relative: &str) -> Cow<'_, str> {
        match self.paths.get(base).and_then(|m| m.get(relative)) {
            Some(resolved) => Cow::Borrowed(resolved.as_str()),
            None => Cow::Owned(crate::paths::resolve_path(base, relative)),
        }
    }

    pub(crate) fn scope<T: 'static>(
        &self,
        id: ScopeId,
    ) -> Result<&CompiledScope<T>, ValidationError> {
        self.scopes
            .get(id.0)
            .and_then(|scope| scope.downcast_ref::<CompiledScope<T>>())
            .ok_or_else(|| {
                ValidationError::UnexpectedState(format!(
                    "scope {id} does not validate `{}`",
                    std::any::type_name::<T>()
                ))
            })
    }
}

impl fmt::Debug for ModelScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelScheme")
            .field("root", &self.root)
            .field("root_type", &self.root_type)
            .field("scopes", &self.scope_types)
            .field("errors", &self.registry.len())
            .field("reference_loop_possible", &self.reference_loop_possible)
            .finish_non_exhaustive()
    }
}
