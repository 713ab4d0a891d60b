//! Error types for the Archivist framework.

use archivist_core::{ApiError, OptionKind};
use thiserror::Error;

/// Errors raised while extracting typed options from an invocation.
///
/// The router answers these with a plain-text reply instead of calling the
/// orchestrator, so the `Display` text is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// A required option was not supplied.
    #[error("Missing required option `{name}`.")]
    Missing {
        /// Option name.
        name: String,
    },

    /// The option was supplied with the wrong type.
    #[error("Option `{name}` expects {expected}, got {actual}.")]
    TypeMismatch {
        /// Option name.
        name: String,
        /// Declared type.
        expected: OptionKind,
        /// Supplied type.
        actual: OptionKind,
    },
}

impl OptionError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing { name: name.into() }
    }
}

/// Errors raised while registering commands with the platform.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The descriptor would be rejected by the platform.
    #[error("invalid command `{command}`: {reason}")]
    InvalidDescriptor {
        /// Command name.
        command: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The platform refused the registration.
    #[error("failed to register command `{command}`: {source}")]
    Registration {
        /// Command name.
        command: String,
        /// Underlying API error.
        #[source]
        source: ApiError,
    },
}

impl RegistryError {
    pub fn invalid(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by the orchestrator.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Replying to the user failed.
    #[error(transparent)]
    Reply(#[from] ApiError),

    /// The orchestrator's own backend failed.
    #[error("orchestrator failure: {0}")]
    Backend(String),
}

impl OrchestratorError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Errors that end the handling of one interaction.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler is bound to the command. This is a wiring bug, not a user
    /// error.
    #[error("no handler registered for command `{0}`")]
    UnregisteredCommand(String),

    /// An option could not be extracted. The router turns this into a reply.
    #[error(transparent)]
    Option(#[from] OptionError),

    /// Replying to the user failed.
    #[error(transparent)]
    Reply(#[from] ApiError),

    /// The orchestrator failed.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// Result type for option extraction.
pub type OptionResult<T> = Result<T, OptionError>;

/// Result type for command registration.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for orchestrator calls.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Result type for dispatching one interaction.
pub type DispatchResult<T = ()> = Result<T, DispatchError>;
