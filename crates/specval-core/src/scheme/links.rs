//! Scope transitions: how a scope reaches the values of a nested scope.
//!
//! At authoring time a [`ScopeLink`] holds the nested [`Specification`]; the
//! factory binds it to the nested scope's id, producing a [`Transition`] that
//! the traversal runs.

use super::factory::SchemeFactory;
use super::ScopeId;
use crate::error::ValidationError;
use crate::specification::Specification;
use crate::validation::Traversal;
use std::marker::PhantomData;

/// Kind of a scope command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// `member` / `member_optional`.
    Member,
    /// `as_model`.
    Model,
    /// `as_nullable`.
    Nullable,
    /// `as_collection`.
    Collection,
    /// `as_dictionary`.
    Dictionary,
    /// `as_converted`.
    Converted,
    /// `as_type`.
    Type,
}

impl LinkKind {
    /// Command name for diagnostics.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Model => "AsModel",
            Self::Nullable => "AsNullable",
            Self::Collection => "AsCollection",
            Self::Dictionary => "AsDictionary",
            Self::Converted => "AsConverted",
            Self::Type => "AsType",
        }
    }

    /// Whether nested values are the same objects the scope sees (or parts
    /// of them). Conversions produce new values.
    #[must_use]
    pub fn preserves_identity(self) -> bool {
        !matches!(self, Self::Converted)
    }

    /// Segment appended for every nested value, when the kind iterates.
    #[must_use]
    pub fn item_segment(self) -> Option<&'static str> {
        match self {
            Self::Collection | Self::Dictionary => Some(crate::paths::INDEX_MARKER),
            _ => None,
        }
    }
}

/// Where a nested value sits relative to the link's base path.
pub(crate) enum Segment {
    Stay,
    Index(usize),
    Key(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Halt,
}

pub(crate) type Visit<'v, U> =
    dyn FnMut(Segment, Option<&U>) -> Result<Flow, ValidationError> + 'v;

/// Produces the nested values of a scope value.
pub(crate) trait Traverse<T, U>: Send + Sync + 'static {
    fn traverse(&self, value: &T, visit: &mut Visit<'_, U>) -> Result<Flow, ValidationError>;
}

pub(crate) struct Member<F>(pub(crate) F);

impl<T, U, F> Traverse<T, U> for Member<F>
where
    T: 'static,
    U: 'static,
    F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
{
    fn traverse(&self, value: &T, visit: &mut Visit<'_, U>) -> Result<Flow, ValidationError> {
        visit(Segment::Stay, (self.0)(value))
    }
}

pub(crate) struct Model;

impl<T: 'static> Traverse<T, T> for Model {
    fn traverse(&self, value: &T, visit: &mut Visit<'_, T>) -> Result<Flow, ValidationError> {
        visit(Segment::Stay, Some(value))
    }
}

pub(crate) struct Nullable;

impl<U: 'static> Traverse<Option<U>, U> for Nullable {
    fn traverse(
        &self,
        value: &Option<U>,
        visit: &mut Visit<'_, U>,
    ) -> Result<Flow, ValidationError> {
        visit(Segment::Stay, value.as_ref())
    }
}

pub(crate) struct Converted<F>(pub(crate) F);

impl<T, U, F> Traverse<T, U> for Converted<F>
where
    T: 'static,
    U: 'static,
    F: Fn(&T) -> U + Send + Sync + 'static,
{
    fn traverse(&self, value: &T, visit: &mut Visit<'_, U>) -> Result<Flow, ValidationError> {
        let converted = (self.0)(value);
        visit(Segment::Stay, Some(&converted))
    }
}

/// Variant cast: a `None` skips the nested scope instead of meaning "null".
pub(crate) struct Cast<F>(pub(crate) F);

impl<T, U, F> Traverse<T, U> for Cast<F>
where
    T: 'static,
    U: 'static,
    F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
{
    fn traverse(&self, value: &T, visit: &mut Visit<'_, U>) -> Result<Flow, ValidationError> {
        match (self.0)(value) {
            Some(cast) => visit(Segment::Stay, Some(cast)),
            None => Ok(Flow::Continue),
        }
    }
}

pub(crate) struct Items;

impl<T, U> Traverse<T, U> for Items
where
    T: 'static,
    U: 'static,
    for<'a> &'a T: IntoIterator<Item = &'a U>,
{
    fn traverse(&self, value: &T, visit: &mut Visit<'_, U>) -> Result<Flow, ValidationError> {
        for (index, item) in IntoIterator::into_iter(value).enumerate() {
            if visit(Segment::Index(index), Some(item))? == Flow::Halt {
                return Ok(Flow::Halt);
            }
        }
        Ok(Flow::Continue)
    }
}

pub(crate) struct Keys<K, F> {
    stringify: F,
    _key: PhantomData<fn(&K)>,
}

impl<K, F> Keys<K, F> {
    pub(crate) fn new(stringify: F) -> Self {
        Self {
            stringify,
            _key: PhantomData,
        }
    }
}

impl<T, K, V, F> Traverse<T, V> for Keys<K, F>
where
    T: 'static,
    K: 'static,
    V: 'static,
    F: Fn(&K) -> String + Send + Sync + 'static,
    for<'a> &'a T: IntoIterator<Item = (&'a K, &'a V)>,
{
    fn traverse(&self, value: &T, visit: &mut Visit<'_, V>) -> Result<Flow, ValidationError> {
        for (key, item) in IntoIterator::into_iter(value) {
            let segment = crate::paths::normalize_path(&(self.stringify)(key)).into_owned();
            if visit(Segment::Key(segment), Some(item))? == Flow::Halt {
                return Ok(Flow::Halt);
            }
        }
        Ok(Flow::Continue)
    }
}

/// Authored scope command.
pub(crate) trait ScopeLink<T>: Send + Sync {
    fn kind(&self) -> LinkKind;

    /// Path segment the link adds by itself (member name).
    fn name(&self) -> Option<&str>;

    /// Resolves the nested specification to a scope id, queueing its
    /// compilation when first seen.
    fn bind(self: Box<Self>, factory: &mut SchemeFactory) -> Box<dyn Transition<T>>;
}

/// Compiled scope command.
pub(crate) trait Transition<T>: Send + Sync {
    fn target(&self) -> ScopeId;

    fn run(&self, value: &T, cx: &mut Traversal<'_>) -> Result<Flow, ValidationError>;
}

pub(crate) struct Link<T, U, X> {
    kind: LinkKind,
    name: Option<String>,
    spec: Specification<U>,
    traverse: X,
    _value: PhantomData<fn(&T)>,
}

impl<T, U, X> Link<T, U, X> {
    pub(crate) fn new(
        kind: LinkKind,
        name: Option<String>,
        spec: Specification<U>,
        traverse: X,
    ) -> Self {
        Self {
            kind,
            name,
            spec,
            traverse,
            _value: PhantomData,
        }
    }
}

impl<T, U, X> ScopeLink<T> for Link<T, U, X>
where
    T: 'static,
    U: 'static,
    X: Traverse<T, U>,
{
    fn kind(&self) -> LinkKind {
        self.kind
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn bind(self: Box<Self>, factory: &mut SchemeFactory) -> Box<dyn Transition<T>> {
        let target = factory.scope_id_for(&self.spec);
        Box::new(Bound::<T, U, X> {
            target,
            traverse: self.traverse,
            _types: PhantomData,
        })
    }
}

struct Bound<T, U, X> {
    target: ScopeId,
    traverse: X,
    _types: PhantomData<fn(&T, &U)>,
}

impl<T, U, X> Transition<T> for Bound<T, U, X>
where
    T: 'static,
    U: 'static,
    X: Traverse<T, U>,
{
    fn target(&self) -> ScopeId {
        self.target
    }

    fn run(&self, value: &T, cx: &mut Traversal<'_>) -> Result<Flow, ValidationError> {
        let target = self.target;
        self.traverse
            .traverse(value, &mut |segment: Segment, item: Option<&U>| {
                cx.enter::<U>(target, segment, item)
            })
    }
}
