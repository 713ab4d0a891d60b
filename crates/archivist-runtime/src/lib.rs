//! Archivist Runtime - hosting layer for the Archivist command adapter.
//!
//! This crate provides:
//! - Layered configuration ([`config`]) with figment
//! - Logging setup ([`logging`])
//! - Command registration at startup and the per-interaction dispatch loop
//!   ([`ArchivistRuntime`])
//!
//! ```ignore
//! use archivist_runtime::{ArchivistRuntime, shutdown_on_ctrl_c};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = ArchivistRuntime::builder().build(MyOrchestrator::connect().await?)?;
//!     runtime.register_commands(&gateway).await?;
//!
//!     let shutdown = CancellationToken::new();
//!     shutdown_on_ctrl_c(shutdown.clone());
//!     runtime.run(gateway.interactions(), shutdown).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ArchivistConfig, ConfigError, ConfigLoader, ConfigResult, validate_config};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{ArchivistRuntime, RuntimeBuilder, RuntimeStats, shutdown_on_ctrl_c};

pub use tokio_util::sync::CancellationToken;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
