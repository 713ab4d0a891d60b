//! A JSON-lines transport.
//!
//! Each stdin line is one interaction:
//!
//! ```json
//! {"command": "status", "options": {"ident": "abc123"}, "guild": 100, "channel": "archivebot"}
//! ```
//!
//! Replies are printed to stdout as JSON lines tagged `response` or
//! `followup`.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use archivist::prelude::*;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Writes one JSON line to stdout. A closed stdout is a transport failure.
fn emit(line: &Value) -> ApiResult<()> {
    writeln!(std::io::stdout().lock(), "{line}")?;
    Ok(())
}

fn default_user() -> String {
    "console".to_string()
}

fn default_true() -> bool {
    true
}

/// One interaction as read from stdin.
#[derive(Debug, Deserialize)]
pub struct ConsoleEvent {
    pub command: String,
    #[serde(default)]
    pub options: ResolvedOptions,
    #[serde(default = "default_user")]
    pub user: String,
    /// Group id; absent for a direct message.
    #[serde(default)]
    pub guild: Option<u64>,
    #[serde(default)]
    pub channel: Option<String>,
    /// The user's permissions in `guild`.
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Set to `false` to emulate a transport without followups.
    #[serde(default = "default_true")]
    pub followups: bool,
}

struct ConsoleGuild {
    id: GroupId,
    user: UserId,
    member: Member,
}

impl Guild for ConsoleGuild {
    fn id(&self) -> GroupId {
        self.id
    }

    fn member(&self, user: UserId) -> Option<Member> {
        (user == self.user).then(|| self.member.clone())
    }
}

/// An interaction read from stdin whose replies go to stdout.
pub struct ConsoleInteraction {
    id: String,
    command: String,
    user: PlatformUser,
    guild: Option<ConsoleGuild>,
    channel: Option<PlatformChannel>,
    options: ResolvedOptions,
    followups: bool,
    acknowledged: AtomicBool,
}

impl ConsoleInteraction {
    pub fn new(event: ConsoleEvent) -> Self {
        let number = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let user = PlatformUser::new(number, event.user);
        let guild = event.guild.map(|id| ConsoleGuild {
            id: GroupId(id),
            user: user.id,
            member: Member::new(
                user.username.clone(),
                event.permissions.iter().copied().collect(),
            ),
        });
        let channel = match (&guild, event.channel) {
            (Some(_), Some(name)) => Some(PlatformChannel::text(number, name)),
            (None, _) => Some(PlatformChannel::direct(number)),
            (Some(_), None) => None,
        };

        Self {
            id: format!("console-{number}"),
            command: event.command,
            user,
            guild,
            channel,
            options: event.options,
            followups: event.followups,
            acknowledged: AtomicBool::new(false),
        }
    }

    fn print(&self, kind: &str, content: &str, ephemeral: bool) -> ApiResult<()> {
        emit(&json!({
            "interaction": self.id,
            "kind": kind,
            "ephemeral": ephemeral,
            "content": content,
        }))
    }
}

#[async_trait]
impl Interaction for ConsoleInteraction {
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
        self.print("response", content, ephemeral)?;
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn followup(&self) -> Option<&dyn FollowupCapability> {
        self.followups.then_some(self as &dyn FollowupCapability)
    }

    fn acknowledgement(&self) -> Option<bool> {
        Some(self.acknowledged.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl FollowupCapability for ConsoleInteraction {
    async fn send_followup(&self, content: &str, ephemeral: bool) -> ApiResult<()> {
        self.print("followup", content, ephemeral)
    }
}

/// Prints registration payloads instead of sending them.
pub struct ConsoleRegistrar;

#[async_trait]
impl CommandRegistrar for ConsoleRegistrar {
    async fn register_command(
        &self,
        descriptor: &CommandDescriptor,
        group: Option<GroupId>,
    ) -> ApiResult<()> {
        emit(&json!({
            "register": descriptor.to_payload(),
            "guild": group.map(GroupId::get),
        }))
    }
}
