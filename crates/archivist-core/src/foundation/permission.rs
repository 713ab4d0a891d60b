//! Member permissions.
//!
//! [`Permissions`] is the raw bit set the platform resolves for a member in a
//! group. [`PermissionView`] answers yes/no capability queries over it, with
//! the platform's override rules applied (owners and administrators hold
//! every permission).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single platform permission.
///
/// Discriminants are the platform's permission bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    KickMembers,
    BanMembers,
    Administrator,
    ManageChannels,
    ManageGuild,
    ViewChannel,
    SendMessages,
    ManageMessages,
    ModerateMembers,
}

impl Permission {
    /// Returns the bit this permission occupies in a [`Permissions`] set.
    pub const fn bit(self) -> u64 {
        match self {
            Self::KickMembers => 1 << 1,
            Self::BanMembers => 1 << 2,
            Self::Administrator => 1 << 3,
            Self::ManageChannels => 1 << 4,
            Self::ManageGuild => 1 << 5,
            Self::ViewChannel => 1 << 10,
            Self::SendMessages => 1 << 11,
            Self::ManageMessages => 1 << 13,
            Self::ModerateMembers => 1 << 40,
        }
    }

    /// Returns the snake_case name used in configuration and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KickMembers => "kick_members",
            Self::BanMembers => "ban_members",
            Self::Administrator => "administrator",
            Self::ManageChannels => "manage_channels",
            Self::ManageGuild => "manage_guild",
            Self::ViewChannel => "view_channel",
            Self::SendMessages => "send_messages",
            Self::ManageMessages => "manage_messages",
            Self::ModerateMembers => "moderate_members",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw permission bit set as resolved by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(u64);

impl Permissions {
    /// The empty set.
    pub const NONE: Self = Self(0);

    /// Creates a set from raw platform bits.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw platform bits.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns `true` if the bit for `permission` is set.
    ///
    /// This is a plain bit test; use [`PermissionView`] for override-aware
    /// queries.
    pub const fn contains(self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    /// Returns a copy of this set with `permission` added.
    #[must_use]
    pub const fn with(self, permission: Permission) -> Self {
        Self(self.0 | permission.bit())
    }
}

impl FromIterator<Permission> for Permissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Yes/no capability queries over one member's permissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionView {
    permissions: Permissions,
    owner: bool,
}

impl PermissionView {
    /// Creates a view over a member's resolved permissions.
    pub fn new(permissions: Permissions, owner: bool) -> Self {
        Self { permissions, owner }
    }

    /// Returns `true` if the member holds `permission`.
    ///
    /// Group owners and administrators implicitly hold every permission.
    pub fn has(&self, permission: Permission) -> bool {
        self.owner
            || self.permissions.contains(Permission::Administrator)
            || self.permissions.contains(permission)
    }

    /// Returns `true` if the member holds at least one of `permissions`.
    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has(*p))
    }

    /// Returns the underlying bit set.
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }
}
