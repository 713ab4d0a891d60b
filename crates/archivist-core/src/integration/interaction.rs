//! The gateway boundary.
//!
//! An [`Interaction`] is the handle a gateway hands over for one inbound
//! slash-command invocation. Transports differ in what they can do beyond
//! the mandatory response call, so the extras are optional capabilities:
//!
//! | Capability | Method | Absent means |
//! |------------|--------|--------------|
//! | Dedicated followups | [`followup`](Interaction::followup) | Later replies reuse [`respond`](Interaction::respond) without privacy |
//! | Self-tracked acknowledgment | [`acknowledgement`](Interaction::acknowledgement) | The caller tracks acknowledgment itself |
//!
//! Both default to `None`, so adapters and test doubles only implement what
//! they actually support.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::foundation::{GroupId, Member, PlatformChannel, PlatformUser, ResolvedOptions, UserId};

/// The group (guild) an interaction originated in.
pub trait Guild: Send + Sync {
    /// Returns the group's identifier.
    fn id(&self) -> GroupId;

    /// Looks up a user's membership in this group.
    fn member(&self, user: UserId) -> Option<Member>;
}

/// Dedicated followup-message capability.
#[async_trait]
pub trait FollowupCapability: Send + Sync {
    /// Sends a followup message for an already-acknowledged interaction.
    async fn send_followup(&self, content: &str, ephemeral: bool) -> ApiResult<()>;
}

/// One inbound slash-command invocation.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Returns the platform's identifier for this invocation.
    fn id(&self) -> &str;

    /// Returns the invoked command's name.
    fn command_name(&self) -> &str;

    /// Returns the invoking user.
    fn user(&self) -> &PlatformUser;

    /// Returns the originating group, or `None` in a direct-message context.
    fn guild(&self) -> Option<&dyn Guild>;

    /// Returns the originating channel, if the platform supplied one.
    fn channel(&self) -> Option<&PlatformChannel>;

    /// Returns the resolved options of this invocation.
    fn options(&self) -> &ResolvedOptions;

    /// Sends a response.
    ///
    /// The first call is the interaction's initial response and is the only
    /// call guaranteed to honour `ephemeral`.
    async fn respond(&self, content: &str, ephemeral: bool) -> ApiResult<()>;

    /// Returns the followup capability, if this transport has one.
    fn followup(&self) -> Option<&dyn FollowupCapability> {
        None
    }

    /// Returns whether the platform already considers this interaction
    /// acknowledged, or `None` if the handle does not track it.
    fn acknowledgement(&self) -> Option<bool> {
        None
    }
}

/// A shared, type-erased interaction handle.
pub type BoxedInteraction = Arc<dyn Interaction>;
