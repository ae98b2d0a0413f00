//! Path and reference bookkeeping for one traversal.

use crate::paths;
use crate::scheme::ScopeId;

struct Level {
    path: String,
    index: Option<String>,
}

/// Stack of generic paths, each with the collection index it introduced.
pub(crate) struct PathStack {
    levels: Vec<Level>,
}

impl PathStack {
    pub(crate) fn new() -> Self {
        Self {
            levels: vec![Level {
                path: String::new(),
                index: None,
            }],
        }
    }

    /// Current generic path.
    pub(crate) fn current(&self) -> &str {
        self.levels.last().map_or("", |level| level.path.as_str())
    }

    pub(crate) fn push(&mut self, path: String, index: Option<usize>) {
        self.levels.push(Level {
            path,
            index: index.map(|i| i.to_string()),
        });
    }

    /// Pops the last pushed level. The root level stays.
    pub(crate) fn pop(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    /// Substitutes the index markers of `generic` with the indexes of the
    /// collections currently entered.
    pub(crate) fn with_indexes(&self, generic: &str) -> String {
        let indexes: Vec<&str> = self
            .levels
            .iter()
            .rev()
            .filter_map(|level| level.index.as_deref())
            .collect();
        paths::get_with_indexes(generic, &indexes)
    }
}

struct Entry {
    scope: ScopeId,
    address: usize,
    path: String,
}

/// Values currently being validated, keyed by scope and address.
pub(crate) struct ReferenceStack {
    entries: Vec<Entry>,
}

impl ReferenceStack {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Pushes a value, or returns the path where the same value was already
    /// entered by the same scope.
    pub(crate) fn try_push(
        &mut self,
        scope: ScopeId,
        address: usize,
        path: String,
    ) -> Result<(), String> {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.scope == scope && e.address == address)
        {
            return Err(entry.path.clone());
        }
        self.entries.push(Entry {
            scope,
            address,
            path,
        });
        Ok(())
    }

    pub(crate) fn pop(&mut self) {
        self.entries.pop();
    }
}
