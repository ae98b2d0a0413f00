//! Walking a model graph against a compiled scheme.
//!
//! One [`Traversal`] runs per validation call. It records failed rules into
//! an [`ErrorsMap`] keyed by concrete paths (with collection indexes), guards
//! against reference loops, and stops early in fail-fast mode.

mod stack;

use crate::error::ValidationError;
use crate::registry::{ErrorId, ErrorsMap};
use crate::scheme::links::{Flow, Segment};
use crate::scheme::scope::{CompiledScope, ErrorMode, LinkStep, Presence, Step};
use crate::scheme::{ModelScheme, ScopeId};
use stack::{PathStack, ReferenceStack};
use std::borrow::Cow;
use tracing::trace;

/// Mutable state of one validation call.
pub(crate) struct Traversal<'s> {
    scheme: &'s ModelScheme,
    errors: ErrorsMap,
    path: PathStack,
    references: Option<ReferenceStack>,
    fail_fast: bool,
    stopped: bool,
    override_depth: usize,
    override_hit: bool,
    discovered: usize,
}

impl<'s> Traversal<'s> {
    pub(crate) fn new(scheme: &'s ModelScheme, fail_fast: bool, loop_protection: bool) -> Self {
        Self {
            scheme,
            errors: ErrorsMap::new(),
            path: PathStack::new(),
            references: loop_protection.then(ReferenceStack::new),
            fail_fast,
            stopped: false,
            override_depth: 0,
            override_hit: false,
            discovered: 0,
        }
    }

    /// Validates `model` with the root scope and returns the recorded errors.
    pub(crate) fn run<T: 'static>(mut self, model: &T) -> Result<ErrorsMap, ValidationError> {
        let root = self.scheme.root();
        self.run_scope(root, Some(model))?;
        trace!(paths = self.errors.len(), "Traversal finished");
        Ok(self.errors)
    }

    /// True when nothing more should be evaluated at this level.
    fn halted(&self) -> bool {
        self.stopped || (self.override_depth > 0 && self.override_hit)
    }

    /// Runs scope `target` on a value reached through a scope command.
    pub(crate) fn enter<U: 'static>(
        &mut self,
        target: ScopeId,
        segment: Segment,
        value: Option<&U>,
    ) -> Result<Flow, ValidationError> {
        let pushed = match segment {
            Segment::Stay => false,
            Segment::Index(index) => {
                let path = self
                    .scheme
                    .resolve_path(self.path.current(), crate::paths::INDEX_MARKER)
                    .into_owned();
                self.path.push(path, Some(index));
                true
            }
            Segment::Key(key) => {
                let path = self
                    .scheme
                    .resolve_path(self.path.current(), &key)
                    .into_owned();
                self.path.push(path, None);
                true
            }
        };

        let result = self.run_scope(target, value);
        if pushed {
            self.path.pop();
        }
        result?;

        Ok(if self.halted() {
            Flow::Halt
        } else {
            Flow::Continue
        })
    }

    fn run_scope<U: 'static>(
        &mut self,
        id: ScopeId,
        value: Option<&U>,
    ) -> Result<(), ValidationError> {
        let scheme = self.scheme;
        let scope = scheme.scope::<U>(id)?;

        let Some(value) = value.filter(|v| !scope.is_null(v)) else {
            if let Presence::Required(error) = scope.presence {
                self.report(error, None);
            }
            return Ok(());
        };

        if let Presence::Forbidden(error) = scope.presence {
            self.report(error, None);
            return Ok(());
        }

        let tracked = self.track::<U>(id, value)?;
        let result = self.run_steps(scope, value);
        if tracked {
            if let Some(references) = self.references.as_mut() {
                references.pop();
            }
        }
        result
    }

    /// Pushes the value onto the reference stack when protection is on.
    /// Zero-sized values share addresses and are never tracked.
    fn track<U: 'static>(&mut self, id: ScopeId, value: &U) -> Result<bool, ValidationError> {
        if std::mem::size_of::<U>() == 0 {
            return Ok(false);
        }
        let Some(references) = self.references.as_mut() else {
            return Ok(false);
        };

        let address = (value as *const U).cast::<()>() as usize;
        let path = self.path.with_indexes(self.path.current());
        match references.try_push(id, address, path.clone()) {
            Ok(()) => Ok(true),
            Err(first_path) => Err(ValidationError::ReferenceLoop {
                type_name: std::any::type_name::<U>(),
                first_path,
                second_path: path,
            }),
        }
    }

    fn run_steps<U: 'static>(
        &mut self,
        scope: &'s CompiledScope<U>,
        value: &U,
    ) -> Result<(), ValidationError> {
        for step in &scope.steps {
            if self.halted() {
                break;
            }

            match step {
                Step::Guard(predicate) => {
                    if !predicate(value) {
                        break;
                    }
                }
                Step::Rule(rule) => {
                    if rule.condition.as_ref().is_some_and(|c| !c(value)) {
                        continue;
                    }
                    if !(rule.predicate)(value) {
                        self.report(rule.error, rule.path.as_deref());
                    }
                }
                Step::Link(link) => {
                    if link.condition.as_ref().is_some_and(|c| !c(value)) {
                        continue;
                    }
                    self.run_link(link, value)?;
                }
            }
        }
        Ok(())
    }

    fn run_link<U: 'static>(
        &mut self,
        link: &'s LinkStep<U>,
        value: &U,
    ) -> Result<(), ValidationError> {
        let pushed = match link.path.as_deref() {
            Some(relative) => {
                let path = self
                    .scheme
                    .resolve_path(self.path.current(), relative)
                    .into_owned();
                self.path.push(path, None);
                true
            }
            None => false,
        };

        let result = match link.mode {
            ErrorMode::Nested => link.transition.run(value, self).map(drop),
            ErrorMode::Override(error) => {
                let outer_hit = self.override_hit;
                self.override_hit = false;
                self.override_depth += 1;
                let result = link.transition.run(value, self);
                self.override_depth -= 1;
                let hit = self.override_hit;
                self.override_hit = outer_hit;
                result.map(|_| {
                    if hit {
                        self.report(error, None);
                    }
                })
            }
            ErrorMode::Append(error) => {
                let before = self.discovered;
                let result = link.transition.run(value, self);
                result.map(|_| {
                    if self.discovered > before {
                        self.report(Some(error), None);
                    }
                })
            }
        };

        if pushed {
            self.path.pop();
        }
        result
    }

    /// Records an error at the current path, or at `relative` to it.
    ///
    /// Inside an overriding scope command nothing is recorded: the first
    /// failure only marks the override as hit.
    fn report(&mut self, error: Option<ErrorId>, relative: Option<&str>) {
        self.discovered += 1;
        if self.override_depth > 0 {
            self.override_hit = true;
            return;
        }
        let Some(error) = error else {
            return;
        };

        let generic = match relative {
            Some(relative) => self.scheme.resolve_path(self.path.current(), relative),
            None => Cow::Borrowed(self.path.current()),
        };
        let path = self.path.with_indexes(&generic);
        self.errors.push(&path, error);

        if self.fail_fast {
            self.stopped = true;
        }
    }
}
