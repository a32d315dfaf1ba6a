//! Error types for Tawsil container operations.
//!
//! Two families matter to callers: [`TawsilError::NotFound`] when nothing
//! could produce a value, and [`TawsilError::Container`] when the container
//! was misused. User code failing inside an invocation surfaces as
//! [`TawsilError::ConstructionFailed`].

use std::fmt;

use crate::kind::Kind;

/// Main error type for all Tawsil operations.
#[derive(Debug, thiserror::Error)]
pub enum TawsilError {
    /// Nothing could produce a value for a service, resolvable, parameter or alias.
    #[error("{}", .0)]
    NotFound(NotFoundError),

    /// The container was used in a way it does not support.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// An invocable returned an error of its own.
    #[error("Failed to invoke {target}: {source}")]
    ConstructionFailed {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TawsilError {
    /// Returns `true` for [`TawsilError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, TawsilError::NotFound(_))
    }

    /// Wraps a user error raised while invoking `target`.
    pub fn construction_failed(
        target: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TawsilError::ConstructionFailed {
            target: target.into(),
            source: source.into(),
        }
    }

    pub(crate) fn service_not_found(id: &str, suggestions: Vec<String>) -> Self {
        TawsilError::NotFound(NotFoundError {
            subject: Subject::Service(id.to_string()),
            suggestions,
        })
    }

    pub(crate) fn unresolvable(id: &str, kind: &Kind) -> Self {
        TawsilError::NotFound(NotFoundError {
            subject: Subject::Resolvable {
                id: id.to_string(),
                kind: kind.clone(),
            },
            suggestions: Vec::new(),
        })
    }

    pub(crate) fn parameter_not_found(name: &str, target: &str) -> Self {
        TawsilError::NotFound(NotFoundError {
            subject: Subject::Parameter {
                name: name.to_string(),
                target: target.to_string(),
            },
            suggestions: Vec::new(),
        })
    }

    pub(crate) fn alias_not_found(type_name: &str) -> Self {
        TawsilError::NotFound(NotFoundError {
            subject: Subject::Alias(type_name.to_string()),
            suggestions: Vec::new(),
        })
    }
}

/// What a [`NotFoundError`] was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A service id passed to `get`.
    Service(String),
    /// An `(id, kind)` pair no resolver could produce.
    Resolvable { id: String, kind: Kind },
    /// A formal parameter no step of the resolution policy could fill.
    Parameter { name: String, target: String },
    /// A type name with no class alias.
    Alias(String),
}

/// Error when nothing could produce a requested value.
///
/// Carries the offending identifier and, where known, close matches.
#[derive(Debug)]
pub struct NotFoundError {
    pub subject: Subject,
    /// Registered ids that look like the requested one
    pub suggestions: Vec<String>,
}

impl NotFoundError {
    /// The identifier that could not be produced.
    pub fn identifier(&self) -> &str {
        match &self.subject {
            Subject::Service(id) | Subject::Resolvable { id, .. } => id,
            Subject::Parameter { name, .. } => name,
            Subject::Alias(type_name) => type_name,
        }
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Subject::Service(id) => write!(f, "Service \"{id}\" not found in container")?,
            Subject::Resolvable { id, kind } => {
                write!(f, "Resource \"{id}\" with kind {kind} could not be resolved")?
            }
            Subject::Parameter { name, target } => write!(
                f,
                "Dependency \"{name}\" of {target} could not be injected"
            )?,
            Subject::Alias(type_name) => {
                write!(f, "Class alias \"{type_name}\" not found in container")?
            }
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        Ok(())
    }
}

/// Misuse of the container, distinct from "not found".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error(
        "Do not use type name \"{0}\" as a service id directly. Use a class alias instead"
    )]
    ReservedServiceId(String),

    #[error("Type \"{0}\" does not exist in the type catalogue")]
    UnknownType(String),

    #[error("Type \"{0}\" has no constructor and cannot be built")]
    NotConstructible(String),

    #[error("Type \"{owner}\" has no method \"{method}\"")]
    MethodNotFound { owner: String, method: String },

    #[error("More than one service ({count}) bound to \"{id}\" in container")]
    AmbiguousService { id: String, count: usize },

    #[error("Type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0} re-entered its own initialization on the same thread")]
    Reentrant(String),
}

/// Convenient Result type for Tawsil operations.
pub type Result<T> = std::result::Result<T, TawsilError>;
