//! # Archivist Core
//!
//! Interaction abstractions for the Archivist slash-command adapter.
//!
//! A chat platform's gateway delivers each slash-command invocation as an
//! [`Interaction`]. This crate turns it into an [`InteractionMessage`]: a
//! message-like object with a user, a channel and reply methods, that
//! enforces the platform's response lifecycle on the caller's behalf.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! Plain data: identifiers ([`UserId`], [`GroupId`], [`ChannelId`]),
//! permissions ([`Permissions`], [`PermissionView`]) and resolved command
//! options ([`ResolvedOptions`]).
//!
//! ### Integration Layer
//!
//! The [`Interaction`] trait gateways implement, with optional followup and
//! acknowledgment capabilities.
//!
//! ### Message Layer
//!
//! [`ResponseController`], [`UserView`], [`ChannelView`] and the composed
//! [`InteractionMessage`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use archivist_core::InteractionMessage;
//!
//! async fn on_interaction(interaction: archivist_core::BoxedInteraction) {
//!     let message = InteractionMessage::new(interaction);
//!     // Initial response.
//!     message.reply("Queued.").await.ok();
//!     // Followup, private inside a guild.
//!     message.reply_privately("Job ident: abc123").await.ok();
//! }
//! ```

pub mod error;
pub mod foundation;
pub mod integration;
pub mod message;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{ApiError, ApiResult};
pub use foundation::{
    ChannelId, ChannelKind, GroupId, Member, OptionKind, OptionValue, Permission, PermissionView,
    Permissions, PlatformChannel, PlatformUser, ResolvedOptions, UserId, canonical_key,
};
pub use integration::{BoxedInteraction, FollowupCapability, Guild, Interaction};
pub use message::{
    ChannelView, DIRECT_MESSAGE_NAME, Delivery, InteractionMessage, ResponseController,
    ResponseState, UserView,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::*;
    pub use super::integration::*;
    pub use super::message::{Delivery, InteractionMessage};
}
