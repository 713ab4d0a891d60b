//! Foundation layer: identifiers, permissions and the plain data an
//! interaction carries.

pub mod ids;
pub mod options;
pub mod permission;
pub mod platform;

pub use ids::{ChannelId, GroupId, UserId};
pub use options::{OptionKind, OptionValue, ResolvedOptions, canonical_key};
pub use permission::{Permission, PermissionView, Permissions};
pub use platform::{ChannelKind, Member, PlatformChannel, PlatformUser};
