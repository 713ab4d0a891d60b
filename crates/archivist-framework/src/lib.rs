//! # Archivist Framework
//!
//! The command layer on top of [`archivist_core`].
//!
//! - [`command`]: descriptors and their registration, globally or per group
//! - [`extractor`]: typed option access
//! - [`router`]: name-to-handler dispatch and the shared job-resolution step
//! - [`orchestrator`]: the trait the command processor implements
//! - [`commands`]: the built-in catalog and its handlers
//!
//! ## Example
//!
//! ```rust,ignore
//! use archivist_framework::prelude::*;
//!
//! let registry = CommandRegistry::new(registrar);
//! registry.register_all(&catalog(), &CommandScope::Global).await?;
//!
//! let router = catalog_router::<MyOrchestrator>();
//! router.dispatch(orchestrator, interaction).await?;
//! ```

pub mod command;
pub mod commands;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod router;

pub use command::{CommandDescriptor, CommandRegistrar, CommandRegistry, CommandScope, OptionSpec};
pub use commands::{STATUS_PROMPT, catalog, catalog_router};
pub use error::{
    DispatchError, DispatchResult, OptionError, OptionResult, OrchestratorError,
    OrchestratorResult, RegistryError, RegistryResult,
};
pub use extractor::OptionExtractor;
pub use orchestrator::{ArchiveDepth, ArchiveRequest, Orchestrator};
pub use router::{BoxedCommandHandler, CommandRouter, Invocation, resolve_job, resolve_job_ident};

/// Prelude for common imports.
pub mod prelude {
    pub use super::command::*;
    pub use super::commands::{catalog, catalog_router};
    pub use super::error::*;
    pub use super::extractor::OptionExtractor;
    pub use super::orchestrator::*;
    pub use super::router::{CommandRouter, Invocation, resolve_job, resolve_job_ident};
}
