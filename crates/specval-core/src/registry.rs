//! Error definitions, their deduplicating registry, and path-keyed error maps.

use crate::args::Arg;
use std::collections::HashMap;
use std::fmt;

/// Identifier of an [`ErrorDefinition`] inside an [`ErrorRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorId(usize);

impl ErrorId {
    /// Returns the raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Immutable description of one kind of violation.
///
/// Two definitions with identical content are the same error: the registry
/// hands out a single id for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ErrorDefinition {
    messages: Vec<String>,
    extra_messages: Vec<String>,
    codes: Vec<String>,
    extra_codes: Vec<String>,
    args: Vec<Arg>,
}

impl ErrorDefinition {
    /// Creates a definition with a single message key and args.
    #[must_use]
    pub fn new(message: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            messages: vec![message.into()],
            args,
            ..Self::default()
        }
    }

    /// Creates a definition with no content at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replaces the messages.
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }

    /// Appends an extra message.
    #[must_use]
    pub fn with_extra_message(mut self, message: impl Into<String>) -> Self {
        self.extra_messages.push(message.into());
        self
    }

    /// Replaces the codes.
    #[must_use]
    pub fn with_codes(mut self, codes: Vec<String>) -> Self {
        self.codes = codes;
        self
    }

    /// Appends an extra code.
    #[must_use]
    pub fn with_extra_code(mut self, code: impl Into<String>) -> Self {
        self.extra_codes.push(code.into());
        self
    }

    /// Replaces the args.
    #[must_use]
    pub fn with_args(mut self, args: Vec<Arg>) -> Self {
        self.args = args;
        self
    }

    /// Message keys or literal templates.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Messages appended after the main ones.
    #[must_use]
    pub fn extra_messages(&self) -> &[String] {
        &self.extra_messages
    }

    /// Codes.
    #[must_use]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Codes appended after the main ones.
    #[must_use]
    pub fn extra_codes(&self) -> &[String] {
        &self.extra_codes
    }

    /// Named args available to the message templates.
    #[must_use]
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Messages followed by extra messages.
    pub fn all_messages(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .chain(&self.extra_messages)
            .map(String::as_str)
    }

    /// Codes followed by extra codes.
    pub fn all_codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().chain(&self.extra_codes).map(String::as_str)
    }

    /// True when the definition would render neither messages nor codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
            && self.extra_messages.is_empty()
            && self.codes.is_empty()
            && self.extra_codes.is_empty()
    }
}

/// Registry of unique error definitions.
#[derive(Debug, Default)]
pub struct ErrorRegistry {
    entries: Vec<ErrorDefinition>,
    lookup: HashMap<ErrorDefinition, ErrorId>,
}

impl ErrorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, reusing the id of an identical one.
    pub fn register(&mut self, definition: ErrorDefinition) -> ErrorId {
        if let Some(id) = self.lookup.get(&definition) {
            return *id;
        }
        let id = ErrorId(self.entries.len());
        self.entries.push(definition.clone());
        self.lookup.insert(definition, id);
        id
    }

    /// Returns the definition behind an id.
    #[must_use]
    pub fn get(&self, id: ErrorId) -> Option<&ErrorDefinition> {
        self.entries.get(id.0)
    }

    /// Number of unique definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(id, definition)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorId, &ErrorDefinition)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (ErrorId(i), e))
    }
}

/// Path → ordered error ids, keeping paths in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorsMap {
    entries: Vec<(String, Vec<ErrorId>)>,
    positions: HashMap<String, usize>,
}

impl ErrorsMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error id at `path`.
    pub fn push(&mut self, path: &str, id: ErrorId) {
        if let Some(position) = self.positions.get(path) {
            self.entries[*position].1.push(id);
            return;
        }
        self.positions.insert(path.to_string(), self.entries.len());
        self.entries.push((path.to_string(), vec![id]));
    }

    /// Appends an error id at `path` unless it is already listed there.
    pub fn push_unique(&mut self, path: &str, id: ErrorId) {
        if self.get(path).is_some_and(|ids| ids.contains(&id)) {
            return;
        }
        self.push(path, id);
    }

    /// Error ids recorded at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[ErrorId]> {
        self.positions
            .get(path)
            .map(|p| self.entries[*p].1.as_slice())
    }

    /// True when no path has errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Paths in first-insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// `(path, ids)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ErrorId])> {
        self.entries
            .iter()
            .map(|(p, ids)| (p.as_str(), ids.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_definitions_share_an_id() {
        let mut registry = ErrorRegistry::new();
        let a = registry.register(ErrorDefinition::new(
            "Texts.MinLength",
            vec![Arg::integer("min", 3)],
        ));
        let b = registry.register(ErrorDefinition::new(
            "Texts.MinLength",
            vec![Arg::integer("min", 3)],
        ));
        let c = registry.register(ErrorDefinition::new(
            "Texts.MinLength",
            vec![Arg::integer("min", 4)],
        ));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn extra_content_makes_a_distinct_error() {
        let mut registry = ErrorRegistry::new();
        let base = ErrorDefinition::new("Global.Error", vec![]);
        let a = registry.register(base.clone());
        let b = registry.register(base.clone().with_extra_code("E1"));
        let c = registry.register(base.with_extra_message("more"));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn empty_definition() {
        assert!(ErrorDefinition::empty().is_empty());
        assert!(!ErrorDefinition::empty().with_extra_code("X").is_empty());
        let def = ErrorDefinition::new("m", vec![]).with_extra_message("x");
        assert_eq!(def.all_messages().collect::<Vec<_>>(), vec!["m", "x"]);
    }

    #[test]
    fn errors_map_keeps_insertion_order() {
        let mut map = ErrorsMap::new();
        map.push("b", ErrorId(1));
        map.push("a", ErrorId(0));
        map.push("b", ErrorId(2));
        map.push_unique("b", ErrorId(2));

        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&[ErrorId(1), ErrorId(2)][..]));
        assert_eq!(map.len(), 2);
        assert!(map.get("c").is_none());
    }
}
