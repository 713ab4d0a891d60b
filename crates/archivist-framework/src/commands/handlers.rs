use std::sync::Arc;

use crate::error::DispatchResult;
use crate::orchestrator::{ArchiveDepth, ArchiveRequest, Orchestrator};
use crate::router::{Invocation, resolve_job, resolve_job_ident};

/// Reply to `status` when neither an ident nor a URL was given.
pub const STATUS_PROMPT: &str = "Please provide either a job ident or a URL to check the status.";

/// Resolves the `ident` option or returns early when the job is unknown.
macro_rules! job_or_return {
    ($orchestrator:expr, $invocation:expr) => {
        match resolve_job($orchestrator.as_ref(), &$invocation).await? {
            Some(job) => job,
            None => return Ok(()),
        }
    };
}

pub(super) async fn archive<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
    depth: ArchiveDepth,
    from_file: bool,
) -> DispatchResult {
    let options = invocation.options();
    let request = ArchiveRequest::new(
        options.require_string("url")?,
        options.string_or_default("parameters")?,
    )
    .depth(depth)
    .from_file(from_file);

    orchestrator.request_archive(invocation.message(), request).await?;
    Ok(())
}

pub(super) async fn status<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let options = invocation.options();
    let message = invocation.message();

    if let Some(ident) = options.non_empty_string("ident")? {
        let Some(job) = resolve_job_ident(orchestrator.as_ref(), &invocation, ident).await? else {
            return Ok(());
        };
        orchestrator.request_status(message, &job).await?;
    } else if let Some(url) = options.non_empty_string("url")? {
        orchestrator.request_status_by_url(message, url).await?;
    } else {
        message.reply(STATUS_PROMPT).await?;
    }
    Ok(())
}

pub(super) async fn ignore<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let pattern = invocation.options().require_string("pattern")?;
    let job = job_or_return!(orchestrator, invocation);
    orchestrator
        .add_ignore_pattern(invocation.message(), &job, pattern)
        .await?;
    Ok(())
}

pub(super) async fn unignore<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let pattern = invocation.options().require_string("pattern")?;
    let job = job_or_return!(orchestrator, invocation);
    orchestrator
        .remove_ignore_pattern(invocation.message(), &job, pattern)
        .await?;
    Ok(())
}

pub(super) async fn ignoreset<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let sets = invocation.options().require_string("sets")?;
    let job = job_or_return!(orchestrator, invocation);
    orchestrator
        .add_ignore_sets(invocation.message(), &job, sets)
        .await?;
    Ok(())
}

pub(super) async fn expire<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let job = job_or_return!(orchestrator, invocation);
    orchestrator.expire(invocation.message(), &job).await?;
    Ok(())
}

pub(super) async fn set_delay<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let options = invocation.options();
    let min = options.require_integer("min")?;
    let max = options.require_integer("max")?;
    let job = job_or_return!(orchestrator, invocation);
    orchestrator
        .set_delay(invocation.message(), &job, min, max)
        .await?;
    Ok(())
}

pub(super) async fn set_concurrency<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let level = invocation.options().require_integer("level")?;
    let job = job_or_return!(orchestrator, invocation);
    orchestrator
        .set_concurrency(invocation.message(), &job, level)
        .await?;
    Ok(())
}

pub(super) async fn yahoo<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let job = job_or_return!(orchestrator, invocation);
    orchestrator.yahoo(invocation.message(), &job).await?;
    Ok(())
}

pub(super) async fn abort<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let job = job_or_return!(orchestrator, invocation);
    orchestrator.initiate_abort(invocation.message(), &job).await?;
    Ok(())
}

pub(super) async fn ignore_reports<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let enabled = invocation.options().require_boolean("enabled")?;
    let job = job_or_return!(orchestrator, invocation);
    orchestrator
        .toggle_ignores(invocation.message(), &job, enabled)
        .await?;
    Ok(())
}

pub(super) async fn pending<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    orchestrator.show_pending(invocation.message()).await?;
    Ok(())
}

pub(super) async fn explain<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let note = invocation.options().require_string("note")?;
    let job = job_or_return!(orchestrator, invocation);
    orchestrator.add_note(invocation.message(), &job, note).await?;
    Ok(())
}

pub(super) async fn whereis<O: Orchestrator>(
    orchestrator: Arc<O>,
    invocation: Invocation,
) -> DispatchResult {
    let job = job_or_return!(orchestrator, invocation);
    orchestrator.whereis(invocation.message(), &job).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use archivist_core::InteractionMessage;
    use archivist_core::testing::{RecordingInteraction, SentKind};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::commands::catalog_router;
    use crate::error::{DispatchError, OrchestratorError, OrchestratorResult};

    /// Records orchestrator calls as `name(args)` strings. Knows one job,
    /// `abc123`.
    #[derive(Default)]
    pub(crate) struct MockOrchestrator {
        calls: Mutex<Vec<String>>,
        backend_down: bool,
    }

    impl MockOrchestrator {
        fn record(&self, call: String) -> OrchestratorResult<()> {
            if self.backend_down {
                return Err(OrchestratorError::backend("redis unreachable"));
            }
            self.calls.lock().push(call);
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Orchestrator for MockOrchestrator {
        type Job = String;

        async fn find_job(
            &self,
            message: &InteractionMessage,
            ident: &str,
        ) -> OrchestratorResult<Option<String>> {
            if ident == "abc123" {
                return Ok(Some(ident.to_string()));
            }
            message
                .reply(&format!("Sorry, I don't know anything about job {ident}."))
                .await?;
            Ok(None)
        }

        async fn request_archive(
            &self,
            _message: &InteractionMessage,
            request: ArchiveRequest,
        ) -> OrchestratorResult<()> {
            self.record(format!(
                "request_archive({}, {:?}, {:?}, {})",
                request.target, request.parameters, request.depth, request.from_file
            ))
        }

        async fn request_status(&self, _: &InteractionMessage, job: &String) -> OrchestratorResult<()> {
            self.record(format!("request_status({job})"))
        }

        async fn request_status_by_url(&self, _: &InteractionMessage, url: &str) -> OrchestratorResult<()> {
            self.record(format!("request_status_by_url({url})"))
        }

        async fn add_ignore_pattern(
            &self,
            _: &InteractionMessage,
            job: &String,
            pattern: &str,
        ) -> OrchestratorResult<()> {
            self.record(format!("add_ignore_pattern({job}, {pattern})"))
        }

        async fn remove_ignore_pattern(
            &self,
            _: &InteractionMessage,
            job: &String,
            pattern: &str,
        ) -> OrchestratorResult<()> {
            self.record(format!("remove_ignore_pattern({job}, {pattern})"))
        }

        async fn add_ignore_sets(&self, _: &InteractionMessage, job: &String, sets: &str) -> OrchestratorResult<()> {
            self.record(format!("add_ignore_sets({job}, {sets})"))
        }

        async fn expire(&self, _: &InteractionMessage, job: &String) -> OrchestratorResult<()> {
            self.record(format!("expire({job})"))
        }

        async fn set_delay(
            &self,
            _: &InteractionMessage,
            job: &String,
            min: i64,
            max: i64,
        ) -> OrchestratorResult<()> {
            self.record(format!("set_delay({job}, {min}, {max})"))
        }

        async fn set_concurrency(&self, _: &InteractionMessage, job: &String, level: i64) -> OrchestratorResult<()> {
            self.record(format!("set_concurrency({job}, {level})"))
        }

        async fn yahoo(&self, _: &InteractionMessage, job: &String) -> OrchestratorResult<()> {
            self.record(format!("yahoo({job})"))
        }

        async fn initiate_abort(&self, _: &InteractionMessage, job: &String) -> OrchestratorResult<()> {
            self.record(format!("initiate_abort({job})"))
        }

        async fn toggle_ignores(&self, _: &InteractionMessage, job: &String, enabled: bool) -> OrchestratorResult<()> {
            self.record(format!("toggle_ignores({job}, {enabled})"))
        }

        async fn show_pending(&self, _: &InteractionMessage) -> OrchestratorResult<()> {
            self.record("show_pending()".to_string())
        }

        async fn add_note(&self, _: &InteractionMessage, job: &String, note: &str) -> OrchestratorResult<()> {
            self.record(format!("add_note({job}, {note})"))
        }

        async fn whereis(&self, _: &InteractionMessage, job: &String) -> OrchestratorResult<()> {
            self.record(format!("whereis({job})"))
        }
    }

    async fn dispatch(
        orchestrator: &Arc<MockOrchestrator>,
        interaction: RecordingInteraction,
    ) -> (DispatchResult, Arc<RecordingInteraction>) {
        let interaction = Arc::new(interaction);
        let result = catalog_router()
            .dispatch(Arc::clone(orchestrator), interaction.clone())
            .await;
        (result, interaction)
    }

    #[tokio::test]
    async fn test_status_with_known_ident() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        let (result, interaction) = dispatch(
            &orchestrator,
            RecordingInteraction::in_guild("status").with_option("ident", "abc123"),
        )
        .await;

        result.unwrap();
        assert_eq!(orchestrator.calls(), ["request_status(abc123)"]);
        assert!(interaction.sent().is_empty());
    }

    #[tokio::test]
    async fn test_status_with_unknown_ident_stops_after_not_found_reply() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        let (result, interaction) = dispatch(
            &orchestrator,
            RecordingInteraction::in_guild("status").with_option("ident", "zzz999"),
        )
        .await;

        result.unwrap();
        assert!(orchestrator.calls().is_empty());
        assert_eq!(
            interaction.contents(),
            ["Sorry, I don't know anything about job zzz999."]
        );
    }

    #[tokio::test]
    async fn test_status_with_blank_ident_looks_it_up() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        let (result, interaction) = dispatch(
            &orchestrator,
            RecordingInteraction::in_guild("status")
                .with_option("ident", "  ")
                .with_option("url", "https://example.com/"),
        )
        .await;

        result.unwrap();
        assert!(orchestrator.calls().is_empty());
        assert_eq!(
            interaction.contents(),
            ["Sorry, I don't know anything about job   ."]
        );
    }

    #[tokio::test]
    async fn test_status_falls_back_to_url() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        let (result, _) = dispatch(
            &orchestrator,
            RecordingInteraction::in_guild("status")
                .with_option("ident", "")
                .with_option("url", "https://example.com/"),
        )
        .await;

        result.unwrap();
        assert_eq!(orchestrator.calls(), ["request_status_by_url(https://example.com/)"]);
    }

    #[tokio::test]
    async fn test_status_without_arguments_prompts() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        let (result, interaction) =
            dispatch(&orchestrator, RecordingInteraction::in_guild("status")).await;

        result.unwrap();
        assert!(orchestrator.calls().is_empty());
        let sent = interaction.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, SentKind::Response);
        assert_eq!(sent[0].content, STATUS_PROMPT);
        assert!(!sent[0].ephemeral);
    }

    #[tokio::test]
    async fn test_archive_variants() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        for command in ["archive", "archive_file", "archiveonly", "archiveonly_file"] {
            let (result, _) = dispatch(
                &orchestrator,
                RecordingInteraction::in_guild(command).with_option("url", "https://example.com/"),
            )
            .await;
            result.unwrap();
        }
        let (result, _) = dispatch(
            &orchestrator,
            RecordingInteraction::direct("archive")
                .with_option("url", "https://example.org/")
                .with_option("parameters", "--no-offsite-links"),
        )
        .await;
        result.unwrap();

        assert_eq!(
            orchestrator.calls(),
            [
                r#"request_archive(https://example.com/, "", Recursive, false)"#,
                r#"request_archive(https://example.com/, "", Recursive, true)"#,
                r#"request_archive(https://example.com/, "", Shallow, false)"#,
                r#"request_archive(https://example.com/, "", Shallow, true)"#,
                r#"request_archive(https://example.org/, "--no-offsite-links", Recursive, false)"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_job_commands_pass_typed_options() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        let invocations = [
            RecordingInteraction::in_guild("set_delay")
                .with_option("min", 250_i64)
                .with_option("max", 375_i64),
            RecordingInteraction::in_guild("set_concurrency").with_option("level", 4_i64),
            RecordingInteraction::in_guild("ignore_reports").with_option("enabled", false),
            RecordingInteraction::in_guild("ignore").with_option("pattern", "obnoxious\\?"),
            RecordingInteraction::in_guild("unignore").with_option("pattern", "obnoxious\\?"),
            RecordingInteraction::in_guild("ignoreset").with_option("sets", "blogs, forums"),
            RecordingInteraction::in_guild("explain").with_option("note", "site closing"),
            RecordingInteraction::in_guild("expire"),
            RecordingInteraction::in_guild("yahoo"),
            RecordingInteraction::in_guild("abort"),
            RecordingInteraction::in_guild("whereis"),
        ];
        for interaction in invocations {
            let (result, _) = dispatch(&orchestrator, interaction.with_option(":ident", "abc123")).await;
            result.unwrap();
        }

        assert_eq!(
            orchestrator.calls(),
            [
                "set_delay(abc123, 250, 375)",
                "set_concurrency(abc123, 4)",
                "toggle_ignores(abc123, false)",
                "add_ignore_pattern(abc123, obnoxious\\?)",
                "remove_ignore_pattern(abc123, obnoxious\\?)",
                "add_ignore_sets(abc123, blogs, forums)",
                "add_note(abc123, site closing)",
                "expire(abc123)",
                "yahoo(abc123)",
                "initiate_abort(abc123)",
                "whereis(abc123)",
            ]
        );
    }

    #[tokio::test]
    async fn test_pending_takes_no_options() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        let (result, _) = dispatch(&orchestrator, RecordingInteraction::direct("pending")).await;

        result.unwrap();
        assert_eq!(orchestrator.calls(), ["show_pending()"]);
    }

    #[tokio::test]
    async fn test_missing_required_option_never_reaches_orchestrator() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        let (result, interaction) = dispatch(
            &orchestrator,
            RecordingInteraction::in_guild("set_delay")
                .with_option("ident", "abc123")
                .with_option("min", 1_i64),
        )
        .await;

        result.unwrap();
        assert!(orchestrator.calls().is_empty());
        assert_eq!(interaction.contents(), ["Missing required option `max`."]);
    }

    #[tokio::test]
    async fn test_wrongly_typed_option_is_answered() {
        let orchestrator = Arc::new(MockOrchestrator::default());
        let (result, interaction) = dispatch(
            &orchestrator,
            RecordingInteraction::in_guild("set_concurrency")
                .with_option("ident", "abc123")
                .with_option("level", "four"),
        )
        .await;

        result.unwrap();
        assert!(orchestrator.calls().is_empty());
        assert_eq!(
            interaction.contents(),
            ["Option `level` expects integer, got string."]
        );
    }

    #[tokio::test]
    async fn test_orchestrator_failure_propagates() {
        let orchestrator = Arc::new(MockOrchestrator {
            backend_down: true,
            ..Default::default()
        });
        let (result, _) = dispatch(&orchestrator, RecordingInteraction::in_guild("pending")).await;

        assert!(matches!(
            result,
            Err(DispatchError::Orchestrator(OrchestratorError::Backend(_)))
        ));
    }
}
