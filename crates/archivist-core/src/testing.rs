//! In-memory interaction doubles.
//!
//! [`RecordingInteraction`] records every platform call instead of sending
//! it, which is what the response and dispatch tests assert against. Enable
//! the `testing` feature to use it from other crates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{ApiError, ApiResult};
use crate::foundation::{
    GroupId, Member, OptionValue, PlatformChannel, PlatformUser, ResolvedOptions,
    UserId,
};
use crate::integration::{FollowupCapability, Guild, Interaction};

/// Which platform call a recorded message went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentKind {
    /// [`Interaction::respond`].
    Response,
    /// [`FollowupCapability::send_followup`].
    Followup,
}

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub kind: SentKind,
    pub content: String,
    pub ephemeral: bool,
}

/// A group with a fixed member table.
#[derive(Debug, Clone)]
pub struct StaticGuild {
    id: GroupId,
    members: HashMap<UserId, Member>,
}

impl StaticGuild {
    pub fn new(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            members: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, user: impl Into<UserId>, member: Member) -> Self {
        self.members.insert(user.into(), member);
        self
    }
}

impl Guild for StaticGuild {
    fn id(&self) -> GroupId {
        self.id
    }

    fn member(&self, user: UserId) -> Option<Member> {
        self.members.get(&user).cloned()
    }
}

/// An [`Interaction`] that records calls instead of sending them.
pub struct RecordingInteraction {
    id: String,
    command: String,
    user: PlatformUser,
    guild: Option<StaticGuild>,
    channel: Option<PlatformChannel>,
    options: ResolvedOptions,
    followups: bool,
    self_tracking: bool,
    acknowledged: AtomicBool,
    latency: Option<Duration>,
    fail_next: Mutex<Option<ApiError>>,
    sent: Mutex<Vec<Sent>>,
}

impl RecordingInteraction {
    /// User id of the default invoking user.
    pub const USER_ID: u64 = 1;
    /// Id of the default group.
    pub const GROUP_ID: u64 = 100;

    fn base(command: &str) -> Self {
        Self {
            id: format!("interaction-{command}"),
            command: command.to_string(),
            user: PlatformUser::new(Self::USER_ID, "alice"),
            guild: None,
            channel: None,
            options: ResolvedOptions::new(),
            followups: true,
            self_tracking: false,
            acknowledged: AtomicBool::new(false),
            latency: None,
            fail_next: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// An invocation from `#archivebot` in a group where the user is a plain
    /// member named "Alice".
    pub fn in_guild(command: &str) -> Self {
        let mut interaction = Self::base(command);
        interaction.guild = Some(
            StaticGuild::new(Self::GROUP_ID)
                .with_member(Self::USER_ID, Member::new("Alice", Default::default())),
        );
        interaction.channel = Some(PlatformChannel::text(10, "archivebot"));
        interaction
    }

    /// An invocation from a direct message.
    pub fn direct(command: &str) -> Self {
        Self::base(command)
    }

    /// Replaces the invoking user's membership in the group.
    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        let guild = self.guild.take().unwrap_or_else(|| StaticGuild::new(Self::GROUP_ID));
        self.guild = Some(guild.with_member(Self::USER_ID, member));
        self
    }

    /// Keeps the group but removes the invoking user's resolved membership.
    #[must_use]
    pub fn without_member(mut self) -> Self {
        self.guild = Some(StaticGuild::new(Self::GROUP_ID));
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: Option<PlatformChannel>) -> Self {
        self.channel = channel;
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Removes the followup capability.
    #[must_use]
    pub fn without_followups(mut self) -> Self {
        self.followups = false;
        self
    }

    /// Makes the handle report its own acknowledgment state.
    #[must_use]
    pub fn self_tracking(mut self) -> Self {
        self.self_tracking = true;
        self
    }

    /// Delays every call, widening race windows in concurrency tests.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Marks the interaction as acknowledged on the platform side.
    pub fn mark_acknowledged(&self) {
        self.acknowledged.store(true, Ordering::SeqCst);
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        *self.fail_next.lock() = Some(error);
    }

    /// Returns every recorded call in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    /// Returns the recorded contents in order.
    pub fn contents(&self) -> Vec<String> {
        self.sent.lock().iter().map(|s| s.content.clone()).collect()
    }

    async fn record(&self, kind: SentKind, content: &str, ephemeral: bool) -> ApiResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = self.fail_next.lock().take() {
            return Err(error);
        }
        self.sent.lock().push(Sent {
            kind,
            content: content.to_string(),
            ephemeral,
        });
        Ok(())
    }
}

#[async_trait]
impl Interaction for RecordingInteraction {
    fn id(&self) -> &str {
        &self.id
    }

    fn command_name(&self) -> &str {
        &self.command
    }

    fn user(&self) -> &PlatformUser {
        &self.user
    }

    fn guild(&self) -> Option<&dyn Guild> {
        self.guild.as_ref().map(|g| g as &dyn Guild)
    }

    fn channel(&self) -> Option<&PlatformChannel> {
        self.channel.as_ref()
    }

    fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    async fn respond(&self, content: &str, ephemeral: bool) -> ApiResult<()> {
        self.record(SentKind::Response, content, ephemeral).await?;
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn followup(&self) -> Option<&dyn FollowupCapability> {
        self.followups.then_some(self as &dyn FollowupCapability)
    }

    fn acknowledgement(&self) -> Option<bool> {
        self.self_tracking
            .then(|| self.acknowledged.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl FollowupCapability for RecordingInteraction {
    async fn send_followup(&self, content: &str, ephemeral: bool) -> ApiResult<()> {
        self.record(SentKind::Followup, content, ephemeral).await
    }
}
