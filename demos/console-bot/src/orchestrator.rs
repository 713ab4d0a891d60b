//! An in-memory orchestrator.
//!
//! Keeps jobs in a map and answers every command with a short text reply.
//! Destructive commands are limited to channel operators.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use archivist::prelude::*;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

const PIPELINE: &str = "console-pipeline";

/// One queued job.
#[derive(Debug)]
pub struct JobRecord {
    pub ident: String,
    pub url: String,
    pub parameters: String,
    pub depth: ArchiveDepth,
    pub from_file: bool,
    pub queued_by: String,
    pub ignores: Vec<String>,
    pub reports: bool,
    pub delay: (i64, i64),
    pub concurrency: i64,
    pub aborted: bool,
    pub notes: Vec<String>,
}

impl JobRecord {
    fn summary(&self) -> String {
        let state = if self.aborted { "aborted" } else { "in progress" };
        let parameters = if self.parameters.is_empty() {
            "none"
        } else {
            self.parameters.as_str()
        };
        format!(
            "Job {} for {} ({}) is {state}. Queued by {}, parameters: {parameters}, {} ignore pattern(s), delay {}-{} ms, concurrency {}.",
            self.ident,
            self.url,
            archive_mode(self.depth, self.from_file),
            self.queued_by,
            self.ignores.len(),
            self.delay.0,
            self.delay.1,
            self.concurrency
        )
    }
}

pub type JobHandle = Arc<Mutex<JobRecord>>;

#[derive(Default)]
pub struct MemoryOrchestrator {
    next_job: AtomicU64,
    jobs: Mutex<BTreeMap<String, JobHandle>>,
}

fn archive_mode(depth: ArchiveDepth, from_file: bool) -> &'static str {
    match (depth, from_file) {
        (_, true) => "URL list",
        (ArchiveDepth::Shallow, false) => "single page",
        (ArchiveDepth::Recursive, false) => "recursive",
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    out.iter().rev().map(|&b| b as char).collect()
}

impl MemoryOrchestrator {
    /// Replies with a refusal and returns `false` unless the user may
    /// operate jobs in this channel.
    async fn require_operator(&self, message: &InteractionMessage) -> OrchestratorResult<bool> {
        if message.channel().is_operator(message.user()) {
            return Ok(true);
        }
        message
            .reply_privately("Sorry, only channel operators can do that.")
            .await?;
        Ok(false)
    }

    fn find_by_url(&self, url: &str) -> Option<JobHandle> {
        self.jobs
            .lock()
            .values()
            .find(|job| job.lock().url == url)
            .cloned()
    }
}

#[async_trait]
impl Orchestrator for MemoryOrchestrator {
    type Job = JobHandle;

    async fn find_job(
        &self,
        message: &InteractionMessage,
        ident: &str,
    ) -> OrchestratorResult<Option<JobHandle>> {
        let job = self.jobs.lock().get(ident.trim()).cloned();
        if job.is_none() {
            message
                .reply(&format!("Sorry, I don't know anything about job {ident}."))
                .await?;
        }
        Ok(job)
    }

    async fn request_archive(
        &self,
        message: &InteractionMessage,
        request: ArchiveRequest,
    ) -> OrchestratorResult<()> {
        if !message.channel().can_speak(message.user()) {
            message
                .reply_privately("Sorry, you are not allowed to queue jobs here.")
                .await?;
            return Ok(());
        }
        if let Some(existing) = self.find_by_url(&request.target) {
            let ident = existing.lock().ident.clone();
            message
                .reply(&format!("{} is already queued as job {ident}.", request.target))
                .await?;
            return Ok(());
        }

        let ident = base36(self.next_job.fetch_add(1, Ordering::Relaxed) + 36 * 36 * 36);
        let job = JobRecord {
            ident: ident.clone(),
            url: request.target.clone(),
            parameters: request.parameters.clone(),
            depth: request.depth,
            from_file: request.from_file,
            queued_by: message.user().display_name().to_string(),
            ignores: Vec::new(),
            reports: true,
            delay: (250, 375),
            concurrency: 1,
            aborted: false,
            notes: Vec::new(),
        };
        self.jobs.lock().insert(ident.clone(), Arc::new(Mutex::new(job)));
        info!(%ident, url = %request.target, "Job queued");

        let mode = archive_mode(request.depth, request.from_file);
        message
            .reply(&format!("Queued {} for archival ({mode}).", request.target))
            .await?;
        message
            .reply_privately(&format!(
                "Use /status ident:{ident} to check progress. Parameters: {:?}.",
                request.parameters
            ))
            .await?;
        Ok(())
    }

    async fn request_status(&self, message: &InteractionMessage, job: &JobHandle) -> OrchestratorResult<()> {
        let text = job.lock().summary();
        message.reply(&text).await?;
        Ok(())
    }

    async fn request_status_by_url(&self, message: &InteractionMessage, url: &str) -> OrchestratorResult<()> {
        match self.find_by_url(url.trim()) {
            Some(job) => self.request_status(message, &job).await,
            None => {
                message.reply(&format!("{url} has not been archived.")).await?;
                Ok(())
            }
        }
    }

    async fn add_ignore_pattern(
        &self,
        message: &InteractionMessage,
        job: &JobHandle,
        pattern: &str,
    ) -> OrchestratorResult<()> {
        let ident = {
            let mut job = job.lock();
            job.ignores.push(pattern.to_string());
            job.ident.clone()
        };
        message.reply(&format!("Added ignore pattern {pattern} to job {ident}.")).await?;
        Ok(())
    }

    async fn remove_ignore_pattern(
        &self,
        message: &InteractionMessage,
        job: &JobHandle,
        pattern: &str,
    ) -> OrchestratorResult<()> {
        let (ident, removed) = {
            let mut job = job.lock();
            let before = job.ignores.len();
            job.ignores.retain(|p| p != pattern);
            (job.ident.clone(), before != job.ignores.len())
        };
        let text = if removed {
            format!("Removed ignore pattern {pattern} from job {ident}.")
        } else {
            format!("Job {ident} has no ignore pattern {pattern}.")
        };
        message.reply(&text).await?;
        Ok(())
    }

    async fn add_ignore_sets(
        &self,
        message: &InteractionMessage,
        job: &JobHandle,
        sets: &str,
    ) -> OrchestratorResult<()> {
        let names: Vec<_> = sets
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let ident = {
            let mut job = job.lock();
            job.ignores.extend(names.iter().map(|name| format!("{{set:{name}}}")));
            job.ident.clone()
        };
        message
            .reply(&format!("Added ignore sets {} to job {ident}.", names.join(", ")))
            .await?;
        Ok(())
    }

    async fn expire(&self, message: &InteractionMessage, job: &JobHandle) -> OrchestratorResult<()> {
        if !self.require_operator(message).await? {
            return Ok(());
        }
        let ident = job.lock().ident.clone();
        self.jobs.lock().remove(&ident);
        message.reply(&format!("Job {ident} expired.")).await?;
        Ok(())
    }

    async fn set_delay(
        &self,
        message: &InteractionMessage,
        job: &JobHandle,
        min: i64,
        max: i64,
    ) -> OrchestratorResult<()> {
        if min < 0 || max < min {
            message
                .reply("Delays must satisfy 0 <= min <= max.")
                .await?;
            return Ok(());
        }
        let ident = {
            let mut job = job.lock();
            job.delay = (min, max);
            job.ident.clone()
        };
        message
            .reply(&format!("Job {ident}: delay set to {min}-{max} ms."))
            .await?;
        Ok(())
    }

    async fn set_concurrency(
        &self,
        message: &InteractionMessage,
        job: &JobHandle,
        level: i64,
    ) -> OrchestratorResult<()> {
        if level < 1 {
            message.reply("Concurrency must be at least 1.").await?;
            return Ok(());
        }
        let ident = {
            let mut job = job.lock();
            job.concurrency = level;
            job.ident.clone()
        };
        message
            .reply(&format!("Job {ident}: concurrency set to {level}."))
            .await?;
        Ok(())
    }

    async fn yahoo(&self, message: &InteractionMessage, job: &JobHandle) -> OrchestratorResult<()> {
        let ident = {
            let mut job = job.lock();
            job.delay = (0, 0);
            job.concurrency = 4;
            job.ident.clone()
        };
        message
            .reply(&format!("Job {ident}: Yahoo! mode enabled (no delay, concurrency 4)."))
            .await?;
        Ok(())
    }

    async fn initiate_abort(&self, message: &InteractionMessage, job: &JobHandle) -> OrchestratorResult<()> {
        if !self.require_operator(message).await? {
            return Ok(());
        }
        let ident = {
            let mut job = job.lock();
            job.aborted = true;
            job.ident.clone()
        };
        message.reply(&format!("Initiated abort for job {ident}.")).await?;
        Ok(())
    }

    async fn toggle_ignores(
        &self,
        message: &InteractionMessage,
        job: &JobHandle,
        enabled: bool,
    ) -> OrchestratorResult<()> {
        let ident = {
            let mut job = job.lock();
            job.reports = enabled;
            job.ident.clone()
        };
        let state = if enabled { "shown" } else { "suppressed" };
        message
            .reply(&format!("Job {ident}: ignore pattern reports {state}."))
            .await?;
        Ok(())
    }

    async fn show_pending(&self, message: &InteractionMessage) -> OrchestratorResult<()> {
        let pending: Vec<String> = self
            .jobs
            .lock()
            .values()
            .filter_map(|job| {
                let job = job.lock();
                (!job.aborted).then(|| format!("{} ({})", job.ident, job.url))
            })
            .collect();

        if pending.is_empty() {
            message.reply("No pending jobs.").await?;
        } else {
            message
                .reply(&format!("{} pending job(s):", pending.len()))
                .await?;
            message.reply_privately(&pending.join("\n")).await?;
        }
        Ok(())
    }

    async fn add_note(
        &self,
        message: &InteractionMessage,
        job: &JobHandle,
        note: &str,
    ) -> OrchestratorResult<()> {
        let author = message.user().display_name().to_string();
        let ident = {
            let mut job = job.lock();
            job.notes.push(format!("{author}: {note}"));
            job.ident.clone()
        };
        message.reply(&format!("Added note to job {ident}.")).await?;
        Ok(())
    }

    async fn whereis(&self, message: &InteractionMessage, job: &JobHandle) -> OrchestratorResult<()> {
        let ident = job.lock().ident.clone();
        message
            .reply(&format!("Job {ident} is on pipeline {PIPELINE}."))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base36() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36 * 36 * 36), "1000");
    }

    fn record(depth: ArchiveDepth, from_file: bool, parameters: &str) -> JobRecord {
        JobRecord {
            ident: "1000".into(),
            url: "https://example.com/".into(),
            parameters: parameters.into(),
            depth,
            from_file,
            queued_by: "console".into(),
            ignores: vec!["\\.css$".into()],
            reports: true,
            delay: (250, 375),
            concurrency: 1,
            aborted: false,
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_summary_reports_queue_settings() {
        let summary = record(ArchiveDepth::Recursive, false, "--no-offsite-links").summary();
        assert_eq!(
            summary,
            "Job 1000 for https://example.com/ (recursive) is in progress. Queued by console, \
             parameters: --no-offsite-links, 1 ignore pattern(s), delay 250-375 ms, concurrency 1."
        );

        let summary = record(ArchiveDepth::Shallow, false, "").summary();
        assert!(summary.contains("(single page)"));
        assert!(summary.contains("parameters: none"));

        let summary = record(ArchiveDepth::Shallow, true, "").summary();
        assert!(summary.contains("(URL list)"));
    }
}
