//! Specification graph compiler.

use super::links::{LinkKind, ScopeLink};
use super::scope::{
    CompiledScope, ErrorMode, LinkStep, OutlineItem, Presence, RuleStep, ScopeOutline, Step,
};
use super::{ModelScheme, ScopeId};
use crate::error::{LocatedIssue, SchemeError};
use crate::paths;
use crate::registry::{ErrorDefinition, ErrorId, ErrorRegistry, ErrorsMap};
use crate::specification::command::{Command, Predicate};
use crate::specification::{SpecId, Specification};
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info};

/// Message key recorded for a null value in a required scope.
pub const REQUIRED_KEY: &str = "Global.Required";

/// Message key recorded for a value in a forbidden scope.
pub const FORBIDDEN_KEY: &str = "Global.Forbidden";

/// Message key marking, in the template, where a reference loop may occur.
pub const REFERENCE_LOOP_KEY: &str = "Global.ReferenceLoop";

trait PendingScope {
    fn compile(self: Box<Self>, factory: &mut SchemeFactory) -> Result<(), SchemeError>;
}

struct Pending<T> {
    id: ScopeId,
    spec: Specification<T>,
}

impl<T: 'static> PendingScope for Pending<T> {
    fn compile(self: Box<Self>, factory: &mut SchemeFactory) -> Result<(), SchemeError> {
        let type_name = std::any::type_name::<T>();
        let draft = self
            .spec
            .draft()
            .ok_or(SchemeError::UndefinedSpecification {
                id: self.spec.id().get(),
                type_name,
            })?;

        factory.issues.extend(draft.issues);
        let (scope, outline) = factory.compile_scope(draft.commands, draft.null_check)?;
        debug!(
            scope = %self.id,
            spec_type = type_name,
            steps = scope.steps.len(),
            "Compiled scope"
        );

        factory.scopes[self.id.0] = Some(Box::new(scope));
        factory.outlines[self.id.0] = Some(outline);
        Ok(())
    }
}

/// Builds a [`ModelScheme`] from a root specification.
pub(crate) struct SchemeFactory {
    ids: HashMap<SpecId, ScopeId>,
    queue: VecDeque<Box<dyn PendingScope>>,
    scopes: Vec<Option<Box<dyn Any + Send + Sync>>>,
    outlines: Vec<Option<ScopeOutline>>,
    registry: ErrorRegistry,
    issues: Vec<LocatedIssue>,
}

impl SchemeFactory {
    pub(crate) fn build<T: 'static>(root: &Specification<T>) -> Result<ModelScheme, SchemeError> {
        let mut factory = Self {
            ids: HashMap::new(),
            queue: VecDeque::new(),
            scopes: Vec::new(),
            outlines: Vec::new(),
            registry: ErrorRegistry::new(),
            issues: Vec::new(),
        };

        let root_id = factory.scope_id_for(root);
        while let Some(pending) = factory.queue.pop_front() {
            pending.compile(&mut factory)?;
        }

        if !factory.issues.is_empty() {
            return Err(SchemeError::InvalidSpecification(factory.issues));
        }

        factory.finish(root_id, std::any::type_name::<T>())
    }

    /// Returns the scope id of `spec`, queueing its compilation on first use.
    pub(crate) fn scope_id_for<T: 'static>(&mut self, spec: &Specification<T>) -> ScopeId {
        if let Some(id) = self.ids.get(&spec.id()) {
            return *id;
        }

        let id = ScopeId(self.scopes.len());
        self.ids.insert(spec.id(), id);
        self.scopes.push(None);
        self.outlines.push(None);
        self.queue.push_back(Box::new(Pending {
            id,
            spec: spec.clone(),
        }));
        id
    }

    fn compile_scope<T: 'static>(
        &mut self,
        commands: Vec<Command<T>>,
        null_check: Option<Predicate<T>>,
    ) -> Result<(CompiledScope<T>, ScopeOutline), SchemeError> {
        let mut presence = None;
        let mut pending: Option<PendingStep<T>> = None;
        let mut steps = Vec::new();
        let mut items = Vec::new();

        for (index, command) in commands.into_iter().enumerate() {
            if command.is_parameter() {
                let label = command.label();
                let step = pending.as_mut().ok_or_else(|| {
                    SchemeError::UnexpectedState(format!(
                        "parameter `{label}` at #{index} has no command to modify"
                    ))
                })?;
                step.apply(command);
                continue;
            }

            if let Some(step) = pending.take() {
                self.flush(step, &mut presence, &mut steps, &mut items);
            }

            match command {
                Command::Required | Command::Optional | Command::Forbidden if index > 0 => {
                    return Err(SchemeError::UnexpectedState(format!(
                        "presence command `{}` at #{index}",
                        command.label()
                    )));
                }
                Command::Required => pending = Some(PendingStep::new(Target::Required)),
                Command::Optional => pending = Some(PendingStep::new(Target::Optional)),
                Command::Forbidden => pending = Some(PendingStep::new(Target::Forbidden)),
                Command::Rule { predicate, error } => {
                    pending = Some(PendingStep::new(Target::Rule { predicate, error }));
                }
                Command::Scope(link) => pending = Some(PendingStep::new(Target::Link(link))),
                Command::WithCondition(predicate) => steps.push(Step::Guard(predicate)),
                _ => {
                    return Err(SchemeError::UnexpectedState(format!(
                        "unhandled command `{}`",
                        command.label()
                    )));
                }
            }
        }

        if let Some(step) = pending.take() {
            self.flush(step, &mut presence, &mut steps, &mut items);
        }

        let presence = match presence {
            Some(presence) => presence,
            None => Presence::Required(Some(
                self.registry
                    .register(ErrorDefinition::new(REQUIRED_KEY, Vec::new())),
            )),
        };

        let outline = ScopeOutline {
            type_name: std::any::type_name::<T>(),
            presence,
            items,
        };
        Ok((
            CompiledScope {
                presence,
                null_check,
                steps,
            },
            outline,
        ))
    }

    fn flush<T: 'static>(
        &mut self,
        step: PendingStep<T>,
        presence: &mut Option<Presence>,
        steps: &mut Vec<Step<T>>,
        items: &mut Vec<OutlineItem>,
    ) {
        let PendingStep {
            target,
            condition,
            path,
            content,
        } = step;

        match target {
            Target::Required => {
                let error =
                    self.register(content.apply(ErrorDefinition::new(REQUIRED_KEY, Vec::new())));
                *presence = Some(Presence::Required(error));
            }
            Target::Optional => *presence = Some(Presence::Optional),
            Target::Forbidden => {
                let error =
                    self.register(content.apply(ErrorDefinition::new(FORBIDDEN_KEY, Vec::new())));
                *presence = Some(Presence::Forbidden(error));
            }
            Target::Rule { predicate, error } => {
                let error = self.register(content.apply(error));
                let path = path.map(|p| match p {
                    PathOverride::Path(path) => path,
                    PathOverride::Name(name) => format!("{}{name}", paths::UPPER_LEVEL_POINTER),
                });
                items.push(OutlineItem::Rule {
                    error,
                    path: path.clone(),
                });
                steps.push(Step::Rule(RuleStep {
                    condition,
                    predicate,
                    error,
                    path,
                }));
            }
            Target::Link(link) => {
                let kind = link.kind();
                let path = match path {
                    Some(PathOverride::Path(path)) => Some(path),
                    Some(PathOverride::Name(name)) if kind == LinkKind::Member => Some(name),
                    Some(PathOverride::Name(name)) => {
                        Some(format!("{}{name}", paths::UPPER_LEVEL_POINTER))
                    }
                    None => link.name().map(str::to_string),
                };

                let mode = if content.is_untouched() {
                    ErrorMode::Nested
                } else if content.overridden {
                    ErrorMode::Override(self.register(content.apply(ErrorDefinition::empty())))
                } else {
                    let error = content.apply(ErrorDefinition::empty());
                    ErrorMode::Append(self.registry.register(error))
                };

                let transition = link.bind(self);
                items.push(OutlineItem::Link {
                    kind,
                    target: transition.target(),
                    path: path.clone(),
                    mode,
                });
                steps.push(Step::Link(LinkStep {
                    condition,
                    transition,
                    path,
                    mode,
                }));
            }
        }
    }

    /// Registers a definition unless it has no content.
    fn register(&mut self, definition: ErrorDefinition) -> Option<ErrorId> {
        (!definition.is_empty()).then(|| self.registry.register(definition))
    }

    fn finish(self, root: ScopeId, root_type: &'static str) -> Result<ModelScheme, SchemeError> {
        let scopes = self
            .scopes
            .into_iter()
            .enumerate()
            .map(|(i, scope)| {
                scope.ok_or_else(|| {
                    SchemeError::UnexpectedState(format!("scope S{i} was never compiled"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let outlines = self
            .outlines
            .into_iter()
            .enumerate()
            .map(|(i, outline)| {
                outline.ok_or_else(|| {
                    SchemeError::UnexpectedState(format!("scope S{i} has no outline"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut walker = Walker {
            outlines: &outlines,
            registry: self.registry,
            template: ErrorsMap::new(),
            paths: HashMap::new(),
            loop_error: None,
            loop_possible: false,
        };
        let mut chain = vec![root];
        walker.walk(root, "", &mut chain, false);

        info!(
            root = root_type,
            scopes = scopes.len(),
            errors = walker.registry.len(),
            reference_loop_possible = walker.loop_possible,
            "Built model scheme"
        );

        Ok(ModelScheme {
            root,
            root_type,
            scopes,
            scope_types: outlines.iter().map(|o| o.type_name).collect(),
            registry: walker.registry,
            template: walker.template,
            paths: walker.paths,
            reference_loop_possible: walker.loop_possible,
        })
    }
}

enum Target<T> {
    Required,
    Optional,
    Forbidden,
    Rule {
        predicate: Predicate<T>,
        error: ErrorDefinition,
    },
    Link(Box<dyn ScopeLink<T>>),
}

enum PathOverride {
    Path(String),
    Name(String),
}

/// Error parameters collected for one command.
///
/// `with_message`, `with_error_cleared` and `with_code` switch to override
/// mode: the command's own content is dropped and only what the parameters
/// provide remains. Extras alone append to the original content.
#[derive(Default)]
struct ContentEdit {
    overridden: bool,
    message: Option<String>,
    extra_messages: Vec<String>,
    code: Option<String>,
    extra_codes: Vec<String>,
}

impl ContentEdit {
    fn is_untouched(&self) -> bool {
        !self.overridden && self.extra_messages.is_empty() && self.extra_codes.is_empty()
    }

    fn apply(&self, original: ErrorDefinition) -> ErrorDefinition {
        let base = if self.overridden {
            ErrorDefinition::empty()
                .with_args(original.args().to_vec())
                .with_messages(self.message.iter().cloned().collect())
                .with_codes(self.code.iter().cloned().collect())
        } else {
            original
        };

        let base = self
            .extra_messages
            .iter()
            .fold(base, |def, message| def.with_extra_message(message.clone()));
        self.extra_codes
            .iter()
            .fold(base, |def, code| def.with_extra_code(code.clone()))
    }
}

struct PendingStep<T> {
    target: Target<T>,
    condition: Option<Predicate<T>>,
    path: Option<PathOverride>,
    content: ContentEdit,
}

impl<T> PendingStep<T> {
    fn new(target: Target<T>) -> Self {
        Self {
            target,
            condition: None,
            path: None,
            content: ContentEdit::default(),
        }
    }

    fn apply(&mut self, parameter: Command<T>) {
        match parameter {
            Command::When(condition) => self.condition = Some(condition),
            Command::WithPath(path) => self.path = Some(PathOverride::Path(path)),
            Command::WithName(name) => self.path = Some(PathOverride::Name(name)),
            Command::WithMessage(message) => {
                self.content.overridden = true;
                self.content.message = Some(message);
            }
            Command::WithErrorCleared => self.content.overridden = true,
            Command::WithExtraMessage(message) => self.content.extra_messages.push(message),
            Command::WithCode(code) => {
                self.content.overridden = true;
                self.content.code = Some(code);
            }
            Command::WithExtraCode(code) => self.content.extra_codes.push(code),
            Command::Required
            | Command::Optional
            | Command::Forbidden
            | Command::Rule { .. }
            | Command::WithCondition(_)
            | Command::Scope(_) => {}
        }
    }
}

/// Static walk over the scope graph from the root, following each path once
/// per chain of distinct scopes.
struct Walker<'o> {
    outlines: &'o [ScopeOutline],
    registry: ErrorRegistry,
    template: ErrorsMap,
    paths: HashMap<String, HashMap<String, String>>,
    loop_error: Option<ErrorId>,
    loop_possible: bool,
}

impl Walker<'_> {
    fn walk(&mut self, scope: ScopeId, path: &str, chain: &mut Vec<ScopeId>, suppressed: bool) {
        let outlines = self.outlines;
        let Some(outline) = outlines.get(scope.0) else {
            return;
        };

        if let Some(error) = outline.presence.error() {
            self.record(path, error, suppressed);
        }

        for item in &outline.items {
            match item {
                OutlineItem::Rule { error, path: relative } => {
                    let resolved = self.resolve(path, relative.as_deref());
                    if let Some(error) = error {
                        self.record(&resolved, *error, suppressed);
                    }
                }
                OutlineItem::Link {
                    kind,
                    target,
                    path: relative,
                    mode,
                } => {
                    let base = self.resolve(path, relative.as_deref());
                    let nested = match kind.item_segment() {
                        Some(segment) => self.resolve(&base, Some(segment)),
                        None => base.clone(),
                    };
                    let nested_suppressed = suppressed || matches!(mode, ErrorMode::Override(_));

                    if chain.contains(target) {
                        if kind.preserves_identity() {
                            self.mark_loop(&nested, nested_suppressed, outline.type_name);
                        }
                    } else {
                        chain.push(*target);
                        self.walk(*target, &nested, chain, nested_suppressed);
                        chain.pop();
                    }

                    match mode {
                        ErrorMode::Override(Some(error)) | ErrorMode::Append(error) => {
                            self.record(&base, *error, suppressed);
                        }
                        ErrorMode::Override(None) | ErrorMode::Nested => {}
                    }
                }
            }
        }
    }

    fn mark_loop(&mut self, path: &str, suppressed: bool, type_name: &'static str) {
        debug!(path, spec_type = type_name, "Possible reference loop");
        self.loop_possible = true;
        let error = match self.loop_error {
            Some(error) => error,
            None => {
                let error = self
                    .registry
                    .register(ErrorDefinition::new(REFERENCE_LOOP_KEY, Vec::new()));
                self.loop_error = Some(error);
                error
            }
        };
        self.record(path, error, suppressed);
    }

    fn record(&mut self, path: &str, error: ErrorId, suppressed: bool) {
        if !suppressed {
            self.template.push_unique(path, error);
        }
    }

    fn resolve(&mut self, base: &str, relative: Option<&str>) -> String {
        let Some(relative) = relative else {
            return base.to_string();
        };
        let resolved = paths::resolve_path(base, relative);
        self.paths
            .entry(base.to_string())
            .or_default()
            .insert(relative.to_string(), resolved.clone());
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::PresenceCommands;

    struct Book {
        title: String,
        tags: Vec<String>,
    }

    fn messages(scheme: &ModelScheme, path: &str) -> Vec<String> {
        scheme
            .template()
            .get(path)
            .unwrap_or_default()
            .iter()
            .flat_map(|id| {
                scheme
                    .registry()
                    .get(*id)
                    .map(|d| d.all_messages().map(str::to_string).collect::<Vec<_>>())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn shared_specifications_compile_once() {
        let text = Specification::<String>::new(|s| s.rule(|v| !v.is_empty()));
        let book = Specification::<Book>::new(move |s| {
            s.member("Title", |b| &b.title, text.clone())
                .member("Subtitle", |b| &b.title, text.clone())
        });

        let scheme = ModelScheme::build(&book).unwrap();
        assert_eq!(scheme.scope_count(), 2);
        assert!(!scheme.is_reference_loop_possible());
        assert_eq!(messages(&scheme, "Title"), vec!["Global.Required", "Global.Error"]);
    }

    #[test]
    fn template_follows_collections_and_paths() {
        let tag = Specification::<String>::new(|s| s.rule(|v| !v.is_empty()).with_message("empty tag"));
        let tags = Specification::<Vec<String>>::new(move |s| s.as_collection(tag.clone()));
        let book = Specification::<Book>::new(move |s| {
            s.member("Tags", |b| &b.tags, tags.clone())
                .rule(|b| !b.title.is_empty())
                .with_path("Meta.Title")
                .with_code("NO_TITLE")
        });

        let scheme = ModelScheme::build(&book).unwrap();
        assert_eq!(messages(&scheme, "Tags.#"), vec!["Global.Required", "empty tag"]);
        assert!(messages(&scheme, "Meta.Title").is_empty());
        assert!(scheme.template().get("Meta.Title").is_some());
        assert_eq!(scheme.resolve_path("", "Meta.Title"), "Meta.Title");
        assert_eq!(scheme.resolve_path("Tags", "#"), "Tags.#");
    }

    #[test]
    fn override_collapses_nested_errors() {
        let tags = Specification::<Vec<String>>::new(|s| s.rule(|v| !v.is_empty()));
        let book = Specification::<Book>::new(move |s| {
            s.member("Tags", |b| &b.tags, tags.clone())
                .with_message("bad tags")
        });

        let scheme = ModelScheme::build(&book).unwrap();
        assert_eq!(messages(&scheme, "Tags"), vec!["bad tags"]);
    }

    #[test]
    fn cleared_error_registers_nothing() {
        let spec = Specification::<u32>::new(|s| s.optional().rule(|v| *v > 0).with_error_cleared());
        let scheme = ModelScheme::build(&spec).unwrap();
        assert!(scheme.registry().is_empty());
        assert!(scheme.template().is_empty());
    }

    #[test]
    fn self_reference_marks_loop() {
        struct Node {
            next: Option<Box<Node>>,
        }
        let node = Specification::<Node>::deferred();
        let inner = node.clone();
        node.define(move |s| s.optional().member_optional("Next", |n| n.next.as_deref(), inner.clone()))
            .unwrap();

        let scheme = ModelScheme::build(&node).unwrap();
        assert_eq!(scheme.scope_count(), 1);
        assert!(scheme.is_reference_loop_possible());
        assert_eq!(messages(&scheme, "Next"), vec![REFERENCE_LOOP_KEY]);
    }

    #[test]
    fn conversions_do_not_loop() {
        let number = Specification::<u64>::deferred();
        let inner = number.clone();
        number
            .define(move |s| s.with_condition(|v| *v > 0).as_converted(|v| v / 2, inner.clone()))
            .unwrap();

        let scheme = ModelScheme::build(&number).unwrap();
        assert!(!scheme.is_reference_loop_possible());
    }

    #[test]
    fn undefined_specification_fails() {
        let missing = Specification::<String>::deferred();
        let book = Specification::<Book>::new(move |s| s.member("Title", |b| &b.title, missing.clone()));
        assert!(matches!(
            ModelScheme::build(&book),
            Err(SchemeError::UndefinedSpecification { .. })
        ));
    }

    #[test]
    fn authoring_issues_are_collected_across_scopes() {
        let text = Specification::<String>::new(|s| s.rule(|_| true).with_code("A B"));
        let book = Specification::<Book>::new(move |s| {
            s.member("Title", |b| &b.title, text.clone())
                .with_path("..")
        });

        match ModelScheme::build(&book) {
            Err(SchemeError::InvalidSpecification(issues)) => assert_eq!(issues.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn with_name_renames_member_segment() {
        let text = Specification::<String>::new(|s| s.rule(|v| !v.is_empty()).with_name("Label"));
        let book = Specification::<Book>::new(move |s| {
            s.member("Title", |b| &b.title, text.clone()).with_name("Heading")
        });

        let scheme = ModelScheme::build(&book).unwrap();
        assert_eq!(messages(&scheme, "Heading"), vec!["Global.Required"]);
        assert_eq!(messages(&scheme, "Label"), vec!["Global.Error"]);
    }
}
