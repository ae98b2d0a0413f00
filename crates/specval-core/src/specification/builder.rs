use super::command::{Command, Predicate};
use super::states::{
    AcceptsCode, AcceptsCondition, AcceptsExtraCode, AcceptsExtraMessage, AcceptsMessage,
    AcceptsPath, AcceptsRules, Forbidden, Open, Required, RuleOut, Start,
};
use super::{Draft, Specification};
use crate::args::{is_valid_arg_name, Arg};
use crate::error::{AuthoringIssue, LocatedIssue};
use crate::paths;
use crate::registry::ErrorDefinition;
use crate::scheme::links::{Cast, Converted, Items, Keys, Link, LinkKind, Member, Model, Nullable};
use std::collections::HashSet;
use std::marker::PhantomData;

/// Message key of the error recorded by [`SpecBuilder::rule`].
pub const ERROR_KEY: &str = "Global.Error";

/// Fluent, order-checked builder of a specification's command list.
///
/// The state parameter `S` tracks which command was appended last, so
/// illegal sequences (two `with_message` calls, `with_path` after
/// `with_code`, anything after `forbidden()` except its error parameters)
/// do not compile. Value-level mistakes (a malformed path, an empty code)
/// are collected and reported when the validator is built.
pub struct SpecBuilder<T, S = Start> {
    draft: Draft<T>,
    _state: PhantomData<fn() -> S>,
}

impl<T: 'static> SpecBuilder<T, Start> {
    pub(crate) fn new() -> Self {
        Self {
            draft: Draft {
                commands: Vec::new(),
                issues: Vec::new(),
                null_check: None,
            },
            _state: PhantomData,
        }
    }
}

/// Presence commands, legal only as the first command of a specification.
///
/// A value is null when the scope command reaching it finds nothing
/// (`member_optional`, `as_nullable`). Builders over `Option<U>` have
/// inherent methods of the same names that take precedence and also treat
/// `None` itself as null.
pub trait PresenceCommands: Sized {
    /// Type the specification validates.
    type Value;

    /// Null values are reported with `Global.Required`. This is the default.
    #[must_use]
    fn required(self) -> SpecBuilder<Self::Value, Required>;

    /// Null values are accepted silently.
    #[must_use]
    fn optional(self) -> SpecBuilder<Self::Value, Open>;

    /// Any non-null value is reported with `Global.Forbidden`.
    #[must_use]
    fn forbidden(self) -> SpecBuilder<Self::Value, Forbidden>;
}

impl<T: 'static> PresenceCommands for SpecBuilder<T, Start> {
    type Value = T;

    fn required(self) -> SpecBuilder<T, Required> {
        self.push(Command::Required)
    }

    fn optional(self) -> SpecBuilder<T, Open> {
        self.push(Command::Optional)
    }

    fn forbidden(self) -> SpecBuilder<T, Forbidden> {
        self.push(Command::Forbidden)
    }
}

impl<U: 'static> SpecBuilder<Option<U>, Start> {
    /// `None` is reported with `Global.Required`, and nothing else runs.
    #[must_use]
    pub fn required(self) -> SpecBuilder<Option<U>, Required> {
        PresenceCommands::required(self.null_when_none())
    }

    /// `None` is accepted silently, and nothing else runs.
    #[must_use]
    pub fn optional(self) -> SpecBuilder<Option<U>, Open> {
        PresenceCommands::optional(self.null_when_none())
    }

    /// `Some` is reported with `Global.Forbidden`; `None` passes silently.
    #[must_use]
    pub fn forbidden(self) -> SpecBuilder<Option<U>, Forbidden> {
        PresenceCommands::forbidden(self.null_when_none())
    }
}

impl<T: 'static, S> SpecBuilder<T, S> {
    fn push<N>(mut self, command: Command<T>) -> SpecBuilder<T, N> {
        self.draft.commands.push(command);
        self.transit()
    }

    fn transit<N>(self) -> SpecBuilder<T, N> {
        SpecBuilder {
            draft: self.draft,
            _state: PhantomData,
        }
    }

    /// Records an authoring issue against the last appended command.
    ///
    /// Rule libraries use this to reject arguments (e.g. `min > max`); the
    /// issue surfaces as [`SchemeError::InvalidSpecification`](crate::SchemeError)
    /// when the validator is built.
    #[must_use]
    pub fn report(mut self, issue: AuthoringIssue) -> Self {
        let command_index = self.draft.commands.len().saturating_sub(1);
        self.draft.issues.push(LocatedIssue {
            type_name: std::any::type_name::<T>(),
            command_index,
            issue,
        });
        self
    }

    /// No-op that reads well between commands.
    #[must_use]
    pub fn and(self) -> Self {
        self
    }

    pub(crate) fn into_draft(self) -> Draft<T> {
        self.draft
    }
}

impl<T: 'static, S: AcceptsRules> SpecBuilder<T, S> {
    /// Adds a predicate; a `false` result records `Global.Error`.
    #[must_use]
    pub fn rule<P>(self, predicate: P) -> SpecBuilder<T, RuleOut>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.push(Command::Rule {
            predicate: Box::new(predicate),
            error: ErrorDefinition::new(ERROR_KEY, Vec::new()),
        })
    }

    /// Adds a predicate with a message key (or literal template) and args
    /// available to its placeholders.
    #[must_use]
    pub fn rule_template<P>(
        self,
        predicate: P,
        message: impl Into<String>,
        args: Vec<Arg>,
    ) -> SpecBuilder<T, RuleOut>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        let issues = check_template(&message, &args);
        let mut next = self.push(Command::Rule {
            predicate: Box::new(predicate),
            error: ErrorDefinition::new(message, args),
        });
        for issue in issues {
            next = next.report(issue);
        }
        next
    }

    /// Stops the scope when `predicate` is false: no later command of this
    /// specification runs for that value.
    #[must_use]
    pub fn with_condition<P>(self, predicate: P) -> SpecBuilder<T, Open>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.push(Command::WithCondition(Box::new(predicate)))
    }

    /// Validates a member with `spec` at path segment `name`.
    #[must_use]
    pub fn member<U, F>(
        self,
        name: &str,
        select: F,
        spec: Specification<U>,
    ) -> SpecBuilder<T, RuleOut>
    where
        U: 'static,
        F: for<'a> Fn(&'a T) -> &'a U + Send + Sync + 'static,
    {
        self.member_optional(name, move |value| Some(select(value)), spec)
    }

    /// Validates a member that may be absent; `None` is the null value the
    /// nested presence command acts on.
    #[must_use]
    pub fn member_optional<U, F>(
        self,
        name: &str,
        select: F,
        spec: Specification<U>,
    ) -> SpecBuilder<T, RuleOut>
    where
        U: 'static,
        F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
    {
        let valid = is_member_name(name);
        let link = Link::new(LinkKind::Member, Some(name.to_string()), spec, Member(select));
        let next = self.push(Command::Scope(Box::new(link)));
        if valid {
            next
        } else {
            next.report(AuthoringIssue::InvalidName(name.to_string()))
        }
    }

    /// Applies another specification to the same value.
    #[must_use]
    pub fn as_model(self, spec: Specification<T>) -> SpecBuilder<T, RuleOut> {
        self.link(LinkKind::Model, spec, Model)
    }

    /// Applies `spec` to the converted value. Conversions produce new values,
    /// so they never take part in reference loop detection.
    #[must_use]
    pub fn as_converted<U, F>(self, convert: F, spec: Specification<U>) -> SpecBuilder<T, RuleOut>
    where
        U: 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.link(LinkKind::Converted, spec, Converted(convert))
    }

    /// Applies `spec` when `cast` succeeds; a `None` skips it silently.
    #[must_use]
    pub fn as_type<U, F>(self, cast: F, spec: Specification<U>) -> SpecBuilder<T, RuleOut>
    where
        U: 'static,
        F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
    {
        self.link(LinkKind::Type, spec, Cast(cast))
    }

    /// Applies `spec` to every item, at paths `#0`, `#1`, ...
    #[must_use]
    pub fn as_collection<U>(self, spec: Specification<U>) -> SpecBuilder<T, RuleOut>
    where
        U: 'static,
        for<'a> &'a T: IntoIterator<Item = &'a U>,
    {
        self.link(LinkKind::Collection, spec, Items)
    }

    /// Applies `spec` to every value, at a path made of its (normalized) key.
    #[must_use]
    pub fn as_dictionary<K, V>(self, spec: Specification<V>) -> SpecBuilder<T, RuleOut>
    where
        K: AsRef<str> + 'static,
        V: 'static,
        for<'a> &'a T: IntoIterator<Item = (&'a K, &'a V)>,
    {
        self.as_dictionary_with(spec, |key: &K| key.as_ref().to_string())
    }

    /// Like [`as_dictionary`](Self::as_dictionary) for keys that are not
    /// text: `stringify` produces the path segment.
    #[must_use]
    pub fn as_dictionary_with<K, V, F>(
        self,
        spec: Specification<V>,
        stringify: F,
    ) -> SpecBuilder<T, RuleOut>
    where
        K: 'static,
        V: 'static,
        F: Fn(&K) -> String + Send + Sync + 'static,
        for<'a> &'a T: IntoIterator<Item = (&'a K, &'a V)>,
    {
        self.link(LinkKind::Dictionary, spec, Keys::new(stringify))
    }

    fn link<U, X>(
        self,
        kind: LinkKind,
        spec: Specification<U>,
        traverse: X,
    ) -> SpecBuilder<T, RuleOut>
    where
        U: 'static,
        X: crate::scheme::links::Traverse<T, U>,
    {
        self.push(Command::Scope(Box::new(Link::new(kind, None, spec, traverse))))
    }
}

impl<U: 'static, S> SpecBuilder<Option<U>, S> {
    fn null_when_none(mut self) -> Self {
        if self.draft.null_check.is_none() {
            self.draft.null_check = Some(Box::new(Option::<U>::is_none));
        }
        self
    }
}

impl<U: 'static, S: AcceptsRules> SpecBuilder<Option<U>, S> {
    /// Applies `spec` to the inner value.
    ///
    /// `None` is null for this scope as well: it gets the presence command
    /// of this specification (`Global.Required` by default) and `spec` is
    /// not entered.
    #[must_use]
    pub fn as_nullable(self, spec: Specification<U>) -> SpecBuilder<Option<U>, RuleOut> {
        self.null_when_none()
            .link(LinkKind::Nullable, spec, Nullable)
    }
}

impl<T: 'static, S: AcceptsCondition> SpecBuilder<T, S> {
    /// Runs the preceding command only when `condition` holds. A skipped
    /// rule records nothing, whatever the value.
    #[must_use]
    pub fn when<P>(self, condition: P) -> SpecBuilder<T, super::states::Condition>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let condition: Predicate<T> = Box::new(condition);
        self.push(Command::When(condition))
    }
}

impl<T: 'static, S: AcceptsPath> SpecBuilder<T, S> {
    /// Records the preceding command's errors at `path`, relative to the
    /// current scope (`<` climbs a level).
    #[must_use]
    pub fn with_path(self, path: &str) -> SpecBuilder<T, super::states::Path> {
        let valid = paths::is_valid_as_path(path);
        let next = self.push(Command::WithPath(path.to_string()));
        if valid {
            next
        } else {
            next.report(AuthoringIssue::InvalidPath(path.to_string()))
        }
    }

    /// Renames the path segment of the preceding command: the member name
    /// for `member`, a sibling segment otherwise.
    #[must_use]
    pub fn with_name(self, name: &str) -> SpecBuilder<T, super::states::Path> {
        let valid = is_member_name(name);
        let next = self.push(Command::WithName(name.to_string()));
        if valid {
            next
        } else {
            next.report(AuthoringIssue::InvalidName(name.to_string()))
        }
    }
}

impl<T: 'static, S: AcceptsMessage> SpecBuilder<T, S> {
    /// Replaces the preceding command's error with a single message.
    ///
    /// For scope commands, all errors found inside the nested scope collapse
    /// into this one error at the scope's path.
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> SpecBuilder<T, S::Next> {
        let message = message.into();
        let empty = message.is_empty();
        let next: SpecBuilder<T, S::Next> = self.push(Command::WithMessage(message));
        if empty {
            next.report(AuthoringIssue::EmptyMessage)
        } else {
            next
        }
    }

    /// Replaces the preceding command's error with one that has no content.
    #[must_use]
    pub fn with_error_cleared(self) -> SpecBuilder<T, S::Next> {
        self.push(Command::WithErrorCleared)
    }
}

impl<T: 'static, S: AcceptsExtraMessage> SpecBuilder<T, S> {
    /// Appends a message to the preceding command's error.
    #[must_use]
    pub fn with_extra_message(self, message: impl Into<String>) -> SpecBuilder<T, S::Next> {
        let message = message.into();
        let empty = message.is_empty();
        let next: SpecBuilder<T, S::Next> = self.push(Command::WithExtraMessage(message));
        if empty {
            next.report(AuthoringIssue::EmptyMessage)
        } else {
            next
        }
    }
}

impl<T: 'static, S: AcceptsCode> SpecBuilder<T, S> {
    /// Replaces the preceding command's error with a single code.
    #[must_use]
    pub fn with_code(self, code: impl Into<String>) -> SpecBuilder<T, S::Next> {
        let code = code.into();
        let issue = check_code(&code);
        let next: SpecBuilder<T, S::Next> = self.push(Command::WithCode(code));
        match issue {
            Some(issue) => next.report(issue),
            None => next,
        }
    }
}

impl<T: 'static, S: AcceptsExtraCode> SpecBuilder<T, S> {
    /// Appends a code to the preceding command's error.
    #[must_use]
    pub fn with_extra_code(self, code: impl Into<String>) -> SpecBuilder<T, S::Next> {
        let code = code.into();
        let issue = check_code(&code);
        let next: SpecBuilder<T, S::Next> = self.push(Command::WithExtraCode(code));
        match issue {
            Some(issue) => next.report(issue),
            None => next,
        }
    }
}

fn is_member_name(name: &str) -> bool {
    paths::is_valid_as_name(name)
        && !name.contains(paths::DIVIDER)
        && !name.contains(paths::UPPER_LEVEL_POINTER)
}

fn check_code(code: &str) -> Option<AuthoringIssue> {
    (code.is_empty() || code.chars().any(char::is_whitespace))
        .then(|| AuthoringIssue::InvalidCode(code.to_string()))
}

fn check_template(message: &str, args: &[Arg]) -> Vec<AuthoringIssue> {
    let mut issues = Vec::new();
    if message.is_empty() {
        issues.push(AuthoringIssue::EmptyMessage);
    }

    let mut seen = HashSet::new();
    for arg in args {
        if !is_valid_arg_name(arg.name()) {
            issues.push(AuthoringIssue::InvalidArgName(arg.name().to_string()));
        } else if !seen.insert(arg.name()) {
            issues.push(AuthoringIssue::DuplicateArgName(arg.name().to_string()));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands<T: 'static>(spec: &Specification<T>) -> Vec<&'static str> {
        spec.draft()
            .map(|d| d.commands.iter().map(Command::label).collect())
            .unwrap_or_default()
    }

    fn issues<T: 'static>(spec: &Specification<T>) -> Vec<AuthoringIssue> {
        spec.draft()
            .map(|d| d.issues.into_iter().map(|i| i.issue).collect())
            .unwrap_or_default()
    }

    #[test]
    fn records_commands_in_order() {
        let spec = Specification::<u32>::new(|s| {
            s.optional()
                .rule(|v| *v > 1)
                .when(|v| *v != 7)
                .with_path("Value")
                .with_message("too small")
                .with_extra_message("really")
                .with_code("SMALL")
                .with_extra_code("S2")
                .and()
                .with_condition(|v| *v < 100)
                .rule(|v| v % 2 == 0)
        });

        assert_eq!(
            commands(&spec),
            vec![
                "Optional",
                "Rule",
                "When",
                "WithPath",
                "WithMessage",
                "WithExtraMessage",
                "WithCode",
                "WithExtraCode",
                "WithCondition",
                "Rule",
            ]
        );
        assert!(issues(&spec).is_empty());
    }

    #[test]
    fn collects_value_issues() {
        let spec = Specification::<u32>::new(|s| {
            s.rule(|_| true)
                .with_path("a..b")
                .with_code("HAS SPACE")
                .rule(|_| true)
                .with_message("")
        });

        assert_eq!(
            issues(&spec),
            vec![
                AuthoringIssue::InvalidPath("a..b".into()),
                AuthoringIssue::InvalidCode("HAS SPACE".into()),
                AuthoringIssue::EmptyMessage,
            ]
        );
    }

    #[test]
    fn issues_point_at_their_command() {
        let spec = Specification::<u32>::new(|s| s.rule(|_| true).rule(|_| true).with_code(""));
        let draft = spec.draft().unwrap();
        assert_eq!(draft.issues.len(), 1);
        assert_eq!(draft.issues[0].command_index, 2);
        assert!(draft.issues[0].type_name.contains("u32"));
    }

    #[test]
    fn rejects_bad_args() {
        let spec = Specification::<u32>::new(|s| {
            s.rule_template(
                |_| true,
                "Key",
                vec![
                    Arg::integer("min", 1),
                    Arg::integer("min", 2),
                    Arg::text("_name", "x"),
                ],
            )
        });

        assert_eq!(
            issues(&spec),
            vec![
                AuthoringIssue::DuplicateArgName("min".into()),
                AuthoringIssue::InvalidArgName("_name".into()),
            ]
        );
    }

    #[test]
    fn member_names_are_single_segments() {
        struct Pair {
            left: u32,
        }
        let inner = Specification::<u32>::new(|s| s);
        let spec = Specification::<Pair>::new(move |s| {
            s.member("a.b", |p| &p.left, inner.clone())
                .member("Left", |p| &p.left, inner.clone())
                .with_name("<Up")
        });

        assert_eq!(
            issues(&spec),
            vec![
                AuthoringIssue::InvalidName("a.b".into()),
                AuthoringIssue::InvalidName("<Up".into()),
            ]
        );
    }

    #[test]
    fn forbidden_accepts_error_parameters() {
        let spec = Specification::<u32>::new(|s| {
            s.forbidden()
                .with_message("no")
                .with_extra_message("never")
                .with_code("NO")
                .with_extra_code("N2")
        });
        assert_eq!(commands(&spec).len(), 5);
    }
}
