//! # Archivist
//!
//! Slash-command interaction adapter and command dispatcher.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐     ┌──────────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ Gateway │────▶│ ArchivistRuntime │────▶│ CommandRouter │────▶│ Orchestrator │
//! └─────────┘     │ (task per call)  │     │ + extractor   │     └──────┬───────┘
//!                 └──────────────────┘     └───────────────┘            │
//!                                                                       ▼
//!                                    InteractionMessage::reply / reply_privately
//!                                    (initial response once, followups after)
//! ```
//!
//! - **Core**: the [`Interaction`](core::Interaction) boundary and the
//!   message views built on it
//! - **Framework**: command descriptors, registration, option extraction,
//!   routing and the built-in command catalog
//! - **Runtime**: configuration, logging and the dispatch loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use archivist::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = ArchivistRuntime::builder().build(MyOrchestrator::default())?;
//!     runtime.register_commands(&gateway).await?;
//!
//!     let shutdown = CancellationToken::new();
//!     shutdown_on_ctrl_c(shutdown.clone());
//!     runtime.run(gateway.interactions(), shutdown).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: load `archivist.toml` files (default)
//! - `json-log`: JSON log output
//! - `testing`: recording interaction doubles

pub use archivist_core as core;
pub use archivist_framework as framework;
pub use archivist_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use archivist::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use archivist_runtime::{ArchivistConfig, ArchivistRuntime, shutdown_on_ctrl_c};
    pub use archivist_runtime::runtime::RuntimeBuilder;

    // Gateway boundary - for transport implementations
    pub use archivist_core::{
        ApiError, ApiResult, BoxedInteraction, FollowupCapability, Guild, Interaction,
    };
    pub use archivist_core::{
        ChannelId, GroupId, Member, OptionValue, Permission, Permissions, PlatformChannel,
        PlatformUser, ResolvedOptions, UserId,
    };

    // Message views - for orchestrator implementations
    pub use archivist_core::{ChannelView, Delivery, InteractionMessage, UserView};

    // Command layer
    pub use archivist_framework::{
        ArchiveDepth, ArchiveRequest, CommandDescriptor, CommandRegistrar, CommandRegistry,
        CommandRouter, CommandScope, DispatchError, DispatchResult, Invocation, Orchestrator,
        OrchestratorError, OrchestratorResult, catalog, catalog_router, resolve_job,
    };

    pub use archivist_runtime::CancellationToken;
}
