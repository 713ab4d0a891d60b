//! Plain data describing who invoked a command and where.

use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, UserId};
use super::permission::{PermissionView, Permissions};

/// The platform-global identity of the invoking user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformUser {
    pub id: UserId,
    pub username: String,
}

impl PlatformUser {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// A user's membership in a group, as resolved by the group's member lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Group-scoped name (nickname or group display name).
    pub display_name: String,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub owner: bool,
}

impl Member {
    pub fn new(display_name: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            display_name: display_name.into(),
            permissions,
            owner: false,
        }
    }

    /// Marks this member as the group owner.
    #[must_use]
    pub fn owner(mut self) -> Self {
        self.owner = true;
        self
    }

    pub fn permission_view(&self) -> PermissionView {
        PermissionView::new(self.permissions, self.owner)
    }
}

/// Kind of channel an interaction originated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    #[default]
    Text,
    DirectMessage,
    Thread,
    Other,
}

/// The channel an interaction originated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformChannel {
    pub id: ChannelId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: ChannelKind,
}

impl PlatformChannel {
    /// A named text channel.
    pub fn text(id: impl Into<ChannelId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            kind: ChannelKind::Text,
        }
    }

    /// A direct-message channel.
    pub fn direct(id: impl Into<ChannelId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind: ChannelKind::DirectMessage,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.kind == ChannelKind::DirectMessage
    }
}
