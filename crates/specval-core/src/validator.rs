//! Entry point: a compiled specification ready to validate models.

use crate::error::{SchemeError, ValidationError};
use crate::result::ValidationResult;
use crate::scheme::ModelScheme;
use crate::settings::Settings;
use crate::specification::Specification;
use crate::translation::MessageService;
use crate::validation::Traversal;
use std::fmt;
use std::marker::PhantomData;
use tracing::{info, trace};

/// Validates models of type `T`.
///
/// Construction compiles the specification graph and pre-renders every
/// message; afterwards the validator is immutable and may be shared across
/// threads. Each call allocates its own traversal state.
///
/// # Example
///
/// ```
/// use specval_core::{Specification, Validator};
///
/// struct User {
///     name: String,
/// }
///
/// let name = Specification::<String>::new(|s| s.rule(|v| v.len() >= 3).with_message("Too short"));
/// let user = Specification::<User>::new(move |s| s.member("Name", |u| &u.name, name.clone()));
/// let validator = Validator::new(&user).unwrap();
///
/// let result = validator.validate(&User { name: "ab".into() }).unwrap();
/// assert_eq!(result.to_string(), "Name: Too short");
/// assert!(validator.is_valid(&User { name: "abc".into() }).unwrap());
/// ```
pub struct Validator<T> {
    scheme: ModelScheme,
    messages: MessageService,
    settings: Settings,
    loop_protection: bool,
    _model: PhantomData<fn(&T)>,
}

impl<T: 'static> Validator<T> {
    /// Compiles `spec` with default settings.
    ///
    /// # Errors
    ///
    /// See [`ModelScheme::build`].
    pub fn new(spec: &Specification<T>) -> Result<Self, SchemeError> {
        Self::with_settings(spec, Settings::default())
    }

    /// Compiles `spec` with `settings`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemeError`] if the specification graph is invalid or the
    /// default translation is not registered.
    pub fn with_settings(spec: &Specification<T>, settings: Settings) -> Result<Self, SchemeError> {
        let scheme = ModelScheme::build(spec)?;
        let messages = MessageService::new(
            settings.translations(),
            settings.default_translation(),
            scheme.registry(),
        )?;
        let loop_protection = settings
            .reference_loop_protection()
            .unwrap_or(scheme.is_reference_loop_possible());

        info!(
            model = scheme.root_type(),
            scopes = scheme.scope_count(),
            errors = scheme.registry().len(),
            loop_protection,
            "Validator ready"
        );

        Ok(Self {
            scheme,
            messages,
            settings,
            loop_protection,
            _model: PhantomData,
        })
    }

    /// True if `model` produces no error. Stops at the first one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReferenceLoop`] if the model graph loops and
    /// protection is on.
    pub fn is_valid(&self, model: &T) -> Result<bool, ValidationError> {
        Ok(self.traverse(model, true)?.is_empty())
    }

    /// Collects every error of `model`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReferenceLoop`] if the model graph loops and
    /// protection is on.
    pub fn validate(&self, model: &T) -> Result<ValidationResult<'_>, ValidationError> {
        let errors = self.traverse(model, false)?;
        Ok(ValidationResult::new(errors, self.scheme.registry(), &self.messages))
    }

    /// Stops at the first error.
    ///
    /// The result is empty exactly when [`validate`](Self::validate) would be.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn validate_fail_fast(&self, model: &T) -> Result<ValidationResult<'_>, ValidationError> {
        let errors = self.traverse(model, true)?;
        Ok(ValidationResult::new(errors, self.scheme.registry(), &self.messages))
    }

    /// Every error the specification can produce, at generic paths.
    #[must_use]
    pub fn template(&self) -> ValidationResult<'_> {
        ValidationResult::new(
            self.scheme.template().clone(),
            self.scheme.registry(),
            &self.messages,
        )
    }

    /// Settings the validator was built with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The compiled scheme.
    #[must_use]
    pub fn scheme(&self) -> &ModelScheme {
        &self.scheme
    }

    /// Number of distinct scopes.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.scheme.scope_count()
    }

    /// Number of distinct error definitions.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.scheme.registry().len()
    }

    /// True if the specification graph can re-enter a scope.
    #[must_use]
    pub fn is_reference_loop_possible(&self) -> bool {
        self.scheme.is_reference_loop_possible()
    }

    /// True if runtime reference tracking is on.
    #[must_use]
    pub fn is_loop_protection_enabled(&self) -> bool {
        self.loop_protection
    }

    fn traverse(&self, model: &T, fail_fast: bool) -> Result<crate::ErrorsMap, ValidationError> {
        trace!(model = self.scheme.root_type(), fail_fast, "Validating");
        Traversal::new(&self.scheme, fail_fast, self.loop_protection).run(model)
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("scheme", &self.scheme)
            .field("settings", &self.settings)
            .field("loop_protection", &self.loop_protection)
            .finish_non_exhaustive()
    }
}
