//! Dispatch of interactions to command handlers.
//!
//! A [`CommandRouter`] maps command names to handlers. Each handler gets the
//! orchestrator as an argument and an [`Invocation`] describing the call:
//!
//! ```rust,ignore
//! async fn expire<O: Orchestrator>(orchestrator: Arc<O>, invocation: Invocation) -> DispatchResult {
//!     let Some(job) = resolve_job(orchestrator.as_ref(), &invocation).await? else {
//!         return Ok(());
//!     };
//!     orchestrator.expire(invocation.message(), &job).await?;
//!     Ok(())
//! }
//!
//! let router = CommandRouter::new().route("expire", expire::<MyOrchestrator>);
//! router.dispatch(orchestrator, interaction).await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use archivist_core::{BoxedInteraction, InteractionMessage};
use futures::future::BoxFuture;
use tracing::debug;

use crate::error::{DispatchError, DispatchResult};
use crate::extractor::OptionExtractor;
use crate::orchestrator::Orchestrator;

// ============================================================================
// Invocation
// ============================================================================

/// One command call as seen by a handler.
#[derive(Debug, Clone)]
pub struct Invocation {
    message: InteractionMessage,
}

impl Invocation {
    pub fn new(message: InteractionMessage) -> Self {
        Self { message }
    }

    /// Returns the message to reply through.
    pub fn message(&self) -> &InteractionMessage {
        &self.message
    }

    /// Returns typed access to the invocation's options.
    pub fn options(&self) -> OptionExtractor<'_> {
        OptionExtractor::new(self.message.options())
    }
}

// ============================================================================
// Job resolution
// ============================================================================

/// Resolves the invocation's required `ident` option to a job.
///
/// Returns `Ok(None)` when the orchestrator reported the job as unknown. It
/// has already told the user, so the handler must stop.
pub async fn resolve_job<O: Orchestrator>(
    orchestrator: &O,
    invocation: &Invocation,
) -> DispatchResult<Option<O::Job>> {
    let ident = invocation.options().require_string("ident")?;
    resolve_job_ident(orchestrator, invocation, ident).await
}

/// Resolves an already extracted identifier to a job.
pub async fn resolve_job_ident<O: Orchestrator>(
    orchestrator: &O,
    invocation: &Invocation,
    ident: &str,
) -> DispatchResult<Option<O::Job>> {
    let job = orchestrator.find_job(invocation.message(), ident).await?;
    if job.is_none() {
        debug!(ident, "Job not found, handler stops");
    }
    Ok(job)
}

// ============================================================================
// Router
// ============================================================================

/// A type-erased command handler.
pub type BoxedCommandHandler<O> =
    Arc<dyn Fn(Arc<O>, Invocation) -> BoxFuture<'static, DispatchResult> + Send + Sync>;

/// Maps command names to handlers.
pub struct CommandRouter<O> {
    handlers: HashMap<String, BoxedCommandHandler<O>>,
}

impl<O: Send + Sync + 'static> CommandRouter<O> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Binds `handler` to `name`, replacing any earlier binding.
    #[must_use]
    pub fn route<F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arc<O>, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DispatchResult> + Send + 'static,
    {
        let handler: BoxedCommandHandler<O> = Arc::new(
            move |orchestrator: Arc<O>, invocation: Invocation| -> BoxFuture<'static, DispatchResult> {
                Box::pin(handler(orchestrator, invocation))
            },
        );
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Returns the bound command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the handler bound to the interaction's command.
    ///
    /// Option errors are answered with a plain-text reply and count as
    /// handled. Anything else, including an unbound command name, is
    /// returned to the caller.
    pub async fn dispatch(
        &self,
        orchestrator: Arc<O>,
        interaction: BoxedInteraction,
    ) -> DispatchResult {
        let Some(handler) = self.handlers.get(interaction.command_name()) else {
            return Err(DispatchError::UnregisteredCommand(
                interaction.command_name().to_string(),
            ));
        };

        let message = InteractionMessage::new(interaction);
        match handler(orchestrator, Invocation::new(message.clone())).await {
            Err(DispatchError::Option(err)) => {
                debug!(error = %err, "Rejected invocation options");
                message.reply(&err.to_string()).await?;
                Ok(())
            }
            result => result,
        }
    }
}

impl<O: Send + Sync + 'static> Default for CommandRouter<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for CommandRouter<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort_unstable();
        f.debug_struct("CommandRouter").field("commands", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use archivist_core::ApiError;
    use archivist_core::testing::{RecordingInteraction, SentKind};
    use tokio_test::assert_err;

    use super::*;

    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    async fn echo(counter: Arc<Counter>, invocation: Invocation) -> DispatchResult {
        counter.calls.fetch_add(1, Ordering::SeqCst);
        let text = invocation.options().require_string("text")?;
        invocation.message().reply(text).await?;
        Ok(())
    }

    fn router() -> CommandRouter<Counter> {
        CommandRouter::new().route("echo", echo)
    }

    #[tokio::test]
    async fn test_dispatches_by_command_name() {
        let counter = Arc::new(Counter::default());
        let interaction = Arc::new(RecordingInteraction::in_guild("echo").with_option("text", "hi"));

        router().dispatch(counter.clone(), interaction.clone()).await.unwrap();

        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(interaction.contents(), ["hi"]);
    }

    #[tokio::test]
    async fn test_unregistered_command_is_an_error() {
        let counter = Arc::new(Counter::default());
        let interaction = Arc::new(RecordingInteraction::in_guild("nope"));

        let err = assert_err!(router().dispatch(counter.clone(), interaction.clone()).await);

        assert!(matches!(err, DispatchError::UnregisteredCommand(ref name) if name == "nope"));
        assert!(interaction.sent().is_empty());
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_option_is_answered_with_a_reply() {
        let counter = Arc::new(Counter::default());
        let interaction = Arc::new(RecordingInteraction::in_guild("echo"));

        router().dispatch(counter, interaction.clone()).await.unwrap();

        let sent = interaction.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, SentKind::Response);
        assert_eq!(sent[0].content, "Missing required option `text`.");
    }

    #[tokio::test]
    async fn test_reply_failures_propagate() {
        let counter = Arc::new(Counter::default());
        let interaction = Arc::new(RecordingInteraction::in_guild("echo").with_option("text", "hi"));
        interaction.fail_next(ApiError::Timeout);

        let err = assert_err!(router().dispatch(counter, interaction).await);

        assert!(matches!(err, DispatchError::Reply(ApiError::Timeout)));
    }

    #[test]
    fn test_names_are_sorted() {
        let router = router().route("abort", echo).route("yahoo", echo);

        assert_eq!(router.names(), ["abort", "echo", "yahoo"]);
        assert!(router.contains("yahoo"));
        assert_eq!(router.len(), 3);
    }
}
