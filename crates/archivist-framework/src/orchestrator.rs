//! The command-processing boundary.
//!
//! The [`Orchestrator`] decides what each command does and owns job state.
//! This crate only extracts arguments and calls into it; every method
//! receives the [`InteractionMessage`] so the orchestrator can answer the
//! user as many times as it likes.

use archivist_core::InteractionMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OrchestratorResult;

/// How far an archive job follows links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveDepth {
    /// Follow links without a depth limit.
    #[default]
    Recursive,
    /// Fetch only the given URL.
    Shallow,
}

/// Arguments of an archive request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRequest {
    /// The URL to archive, or the URL of a list of URLs when `from_file`.
    pub target: String,
    /// Free-form job parameters, empty when none were given.
    pub parameters: String,
    pub depth: ArchiveDepth,
    /// `target` points to a URL list rather than a single page.
    pub from_file: bool,
}

impl ArchiveRequest {
    pub fn new(target: impl Into<String>, parameters: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            parameters: parameters.into(),
            depth: ArchiveDepth::Recursive,
            from_file: false,
        }
    }

    #[must_use]
    pub fn depth(mut self, depth: ArchiveDepth) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn from_file(mut self, from_file: bool) -> Self {
        self.from_file = from_file;
        self
    }
}

/// The external component that owns job semantics.
///
/// Implementations reply through the message themselves; an `Err` means the
/// orchestrator could not do its job at all (for example its store is
/// unreachable) and is logged by the hosting runtime.
#[async_trait]
pub trait Orchestrator: Send + Sync + 'static {
    /// A job handle returned by [`find_job`](Orchestrator::find_job).
    type Job: Send + Sync;

    /// Looks up a job by identifier.
    ///
    /// When there is no such job the orchestrator tells the user and returns
    /// `Ok(None)`; the caller must then stop handling the command.
    async fn find_job(
        &self,
        message: &InteractionMessage,
        ident: &str,
    ) -> OrchestratorResult<Option<Self::Job>>;

    async fn request_archive(
        &self,
        message: &InteractionMessage,
        request: ArchiveRequest,
    ) -> OrchestratorResult<()>;

    async fn request_status(
        &self,
        message: &InteractionMessage,
        job: &Self::Job,
    ) -> OrchestratorResult<()>;

    async fn request_status_by_url(
        &self,
        message: &InteractionMessage,
        url: &str,
    ) -> OrchestratorResult<()>;

    async fn add_ignore_pattern(
        &self,
        message: &InteractionMessage,
        job: &Self::Job,
        pattern: &str,
    ) -> OrchestratorResult<()>;

    async fn remove_ignore_pattern(
        &self,
        message: &InteractionMessage,
        job: &Self::Job,
        pattern: &str,
    ) -> OrchestratorResult<()>;

    /// Applies named ignore sets. `sets` is the raw comma-separated list.
    async fn add_ignore_sets(
        &self,
        message: &InteractionMessage,
        job: &Self::Job,
        sets: &str,
    ) -> OrchestratorResult<()>;

    async fn expire(&self, message: &InteractionMessage, job: &Self::Job) -> OrchestratorResult<()>;

    /// Sets the delay bounds in milliseconds.
    async fn set_delay(
        &self,
        message: &InteractionMessage,
        job: &Self::Job,
        min: i64,
        max: i64,
    ) -> OrchestratorResult<()>;

    async fn set_concurrency(
        &self,
        message: &InteractionMessage,
        job: &Self::Job,
        level: i64,
    ) -> OrchestratorResult<()>;

    async fn yahoo(&self, message: &InteractionMessage, job: &Self::Job) -> OrchestratorResult<()>;

    async fn initiate_abort(
        &self,
        message: &InteractionMessage,
        job: &Self::Job,
    ) -> OrchestratorResult<()>;

    /// Enables or suppresses ignore pattern reports.
    async fn toggle_ignores(
        &self,
        message: &InteractionMessage,
        job: &Self::Job,
        enabled: bool,
    ) -> OrchestratorResult<()>;

    async fn show_pending(&self, message: &InteractionMessage) -> OrchestratorResult<()>;

    async fn add_note(
        &self,
        message: &InteractionMessage,
        job: &Self::Job,
        note: &str,
    ) -> OrchestratorResult<()>;

    async fn whereis(&self, message: &InteractionMessage, job: &Self::Job) -> OrchestratorResult<()>;
}
