//! The hosting runtime.
//!
//! [`ArchivistRuntime`] owns the configuration, the orchestrator and the
//! command router. At startup it registers the command catalog with the
//! platform; afterwards it consumes interactions from a channel fed by the
//! gateway and handles each one on its own task.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use archivist_runtime::{ArchivistRuntime, shutdown_on_ctrl_c};
//! use tokio_util::sync::CancellationToken;
//!
//! let runtime = ArchivistRuntime::builder().profile("production").build(orchestrator)?;
//! runtime.register_commands(&registrar).await?;
//!
//! let shutdown = CancellationToken::new();
//! shutdown_on_ctrl_c(shutdown.clone());
//! runtime.run(interactions, shutdown).await;
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use archivist_core::BoxedInteraction;
use archivist_framework::{
    CommandDescriptor, CommandRegistrar, CommandRegistry, CommandRouter, DispatchError,
    Orchestrator, catalog, catalog_router,
};
use tokio::signal;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::{ArchivistConfig, ConfigLoader, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// Counters for handled interactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Interactions whose handler completed.
    pub handled: u64,
    /// Interactions whose handler returned an error or panicked.
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    handled: AtomicU64,
    failed: AtomicU64,
}

/// Registers commands and dispatches interactions to their handlers.
pub struct ArchivistRuntime<O> {
    config: ArchivistConfig,
    orchestrator: Arc<O>,
    router: Arc<CommandRouter<O>>,
    descriptors: Vec<CommandDescriptor>,
    counters: Arc<Counters>,
}

impl<O: Orchestrator> ArchivistRuntime<O> {
    /// Creates a runtime serving the built-in command catalog.
    pub fn new(config: ArchivistConfig, orchestrator: O) -> Self {
        Self::with_commands(config, orchestrator, catalog(), catalog_router())
    }

    /// Creates a runtime builder that loads configuration from disk and
    /// the environment.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }
}

impl<O: Send + Sync + 'static> ArchivistRuntime<O> {
    /// Creates a runtime serving a custom command set.
    pub fn with_commands(
        config: ArchivistConfig,
        orchestrator: O,
        descriptors: Vec<CommandDescriptor>,
        router: CommandRouter<O>,
    ) -> Self {
        for descriptor in &descriptors {
            if !router.contains(descriptor.name()) {
                warn!(command = descriptor.name(), "Command has no handler bound");
            }
        }

        Self {
            config,
            orchestrator: Arc::new(orchestrator),
            router: Arc::new(router),
            descriptors,
            counters: Arc::default(),
        }
    }

    pub fn config(&self) -> &ArchivistConfig {
        &self.config
    }

    pub fn orchestrator(&self) -> &Arc<O> {
        &self.orchestrator
    }

    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            handled: self.counters.handled.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Registers every command in the configured scope.
    ///
    /// Returns the number of platform calls made.
    pub async fn register_commands<R: CommandRegistrar>(&self, registrar: R) -> RuntimeResult<usize> {
        let scope = self.config.commands.scope();
        let calls = CommandRegistry::new(registrar)
            .register_all(&self.descriptors, &scope)
            .await?;
        Ok(calls)
    }

    /// Handles interactions until `shutdown` is cancelled or the channel
    /// closes, then waits for in-flight handlers to finish.
    pub async fn run(&self, mut interactions: mpsc::Receiver<BoxedInteraction>, shutdown: CancellationToken) {
        let max_in_flight = self.config.runtime.max_in_flight.max(1);
        let permits = Arc::new(Semaphore::new(max_in_flight));
        let mut tasks = JoinSet::new();

        info!(max_in_flight, "Archivist runtime is now running");

        loop {
            let interaction = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
                next = interactions.recv() => match next {
                    Some(interaction) => interaction,
                    None => {
                        info!("Interaction channel closed");
                        break;
                    }
                },
            };

            let permit = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
                permit = Arc::clone(&permits).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let router = Arc::clone(&self.router);
            let orchestrator = Arc::clone(&self.orchestrator);
            let counters = Arc::clone(&self.counters);
            tasks.spawn(async move {
                handle_interaction(&router, orchestrator, interaction, &counters).await;
                drop(permit);
            });

            while let Some(joined) = tasks.try_join_next() {
                self.reap(joined);
            }
        }

        if !tasks.is_empty() {
            info!(in_flight = tasks.len(), "Waiting for in-flight interactions");
        }
        while let Some(joined) = tasks.join_next().await {
            self.reap(joined);
        }

        info!(handled = self.stats().handled, failed = self.stats().failed, "Runtime stopped");
    }

    fn reap(&self, joined: Result<(), tokio::task::JoinError>) {
        if let Err(e) = joined {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, "Interaction task panicked");
        }
    }
}

async fn handle_interaction<O: Send + Sync + 'static>(
    router: &CommandRouter<O>,
    orchestrator: Arc<O>,
    interaction: BoxedInteraction,
    counters: &Counters,
) {
    let span = info_span!(
        "interaction",
        command = %interaction.command_name(),
        interaction_id = %interaction.id(),
    );

    async move {
        debug!("Dispatching interaction");
        match router.dispatch(orchestrator, interaction).await {
            Ok(()) => {
                counters.handled.fetch_add(1, Ordering::Relaxed);
                debug!("Interaction handled");
            }
            Err(DispatchError::UnregisteredCommand(command)) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(%command, "No handler registered for command");
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(error = %e, "Interaction failed");
            }
        }
    }
    .instrument(span)
    .await
}

// =============================================================================
// Shutdown
// =============================================================================

/// Cancels `token` on Ctrl+C, or SIGTERM on Unix.
pub fn shutdown_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if wait_for_shutdown_signal().await {
            token.cancel();
        }
    })
}

/// Returns `false` if no signal handler could be installed.
async fn wait_for_shutdown_signal() -> bool {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    result = signal::ctrl_c() => {
                        if let Err(e) = result {
                            error!(error = %e, "Failed to listen for Ctrl+C");
                            return false;
                        }
                        info!("Received Ctrl+C, shutting down");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down");
                    }
                }
                return true;
            }
            Err(e) => warn!(error = %e, "Failed to register SIGTERM handler"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, shutting down");
            true
        }
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            false
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builds an [`ArchivistRuntime`] from layered configuration.
///
/// `build` validates the configuration and initializes logging from it.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges programmatic overrides above every other source.
    pub fn merge(mut self, config: ArchivistConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Loads the configuration and builds a runtime serving the built-in
    /// command catalog.
    pub fn build<O: Orchestrator>(self, orchestrator: O) -> RuntimeResult<ArchivistRuntime<O>> {
        let config = self.load()?;
        Ok(ArchivistRuntime::new(config, orchestrator))
    }

    /// Loads and validates the configuration, then initializes logging.
    pub fn load(self) -> RuntimeResult<ArchivistConfig> {
        let config = self.config_loader.load()?;
        validate_config(&config)?;
        logging::init_from_config(&config.logging);

        info!(
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            guilds = config.commands.guilds.len(),
            "Runtime initialized from configuration"
        );
        Ok(config)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
