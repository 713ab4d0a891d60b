//! The message abstraction handed to command handlers.
//!
//! [`InteractionMessage`] wraps one [`Interaction`](crate::Interaction) and
//! exposes what a command processor expects from a chat message: who sent
//! it, where it came from, and a way to answer.
//!
//! ```text
//! InteractionMessage
//! ├── UserView            display name, permissions, send_private()
//! ├── ChannelView         name, is_operator(), can_speak()
//! └── ResponseController  initial response vs. followup
//! ```

mod channel;
mod response;
mod user;

use std::sync::Arc;

pub use channel::{ChannelView, DIRECT_MESSAGE_NAME, OPERATOR_PERMISSIONS, VOICE_PERMISSIONS};
pub use response::{Delivery, ResponseController, ResponseState};
pub use user::UserView;

use crate::error::ApiResult;
use crate::foundation::{GroupId, ResolvedOptions};
use crate::integration::BoxedInteraction;

/// One command invocation, viewed as a replyable message.
///
/// Cheap to clone; clones share the same response state.
#[derive(Debug, Clone)]
pub struct InteractionMessage {
    controller: Arc<ResponseController>,
    user: UserView,
    channel: ChannelView,
}

impl InteractionMessage {
    /// Wraps a freshly received interaction.
    pub fn new(interaction: BoxedInteraction) -> Self {
        let channel = ChannelView::new(interaction.as_ref());
        let controller = Arc::new(ResponseController::new(interaction));
        let user = UserView::new(Arc::clone(&controller));
        Self {
            controller,
            user,
            channel,
        }
    }

    pub fn user(&self) -> &UserView {
        &self.user
    }

    pub fn channel(&self) -> &ChannelView {
        &self.channel
    }

    /// Returns the underlying interaction handle.
    pub fn interaction(&self) -> &BoxedInteraction {
        self.controller.interaction()
    }

    /// Returns the invoked command's name.
    pub fn command_name(&self) -> &str {
        self.controller.interaction().command_name()
    }

    /// Returns the invocation's resolved options.
    pub fn options(&self) -> &ResolvedOptions {
        self.controller.interaction().options()
    }

    /// Returns the originating group, if any.
    pub fn group(&self) -> Option<GroupId> {
        self.channel.group()
    }

    pub fn has_group_context(&self) -> bool {
        self.controller.supports_private()
    }

    /// Returns the acknowledgment state tracked for this interaction.
    pub async fn response_state(&self) -> ResponseState {
        self.controller.state().await
    }

    /// Replies publicly.
    pub async fn reply(&self, text: &str) -> ApiResult<Delivery> {
        self.controller.reply(text, false).await
    }

    /// Replies privately inside a group, publicly in a direct message.
    pub async fn reply_privately(&self, text: &str) -> ApiResult<Delivery> {
        self.controller.reply_privately(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingInteraction, SentKind};

    #[tokio::test]
    async fn test_mixed_reply_sequence_has_one_initial_response() {
        let interaction = Arc::new(RecordingInteraction::in_guild("status"));
        let message = InteractionMessage::new(interaction.clone());

        message.reply_privately("p1").await.unwrap();
        message.reply("r1").await.unwrap();
        message.user().send_private("p2").await.unwrap();
        message.clone().reply("r2").await.unwrap();

        let sent = interaction.sent();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent.iter().filter(|s| s.kind == SentKind::Response).count(), 1);
        assert_eq!(sent[0].kind, SentKind::Response);
        assert_eq!(
            sent.iter().map(|s| s.ephemeral).collect::<Vec<_>>(),
            [true, false, true, false]
        );
    }

    #[tokio::test]
    async fn test_private_replies_are_public_in_direct_messages() {
        let interaction = Arc::new(RecordingInteraction::direct("status"));
        let message = InteractionMessage::new(interaction.clone());

        message.reply_privately("one").await.unwrap();
        message.user().send_private("two").await.unwrap();

        assert!(interaction.sent().iter().all(|s| !s.ephemeral));
        assert!(!message.has_group_context());
    }

    #[tokio::test]
    async fn test_reply_never_requests_privacy() {
        let interaction = Arc::new(RecordingInteraction::in_guild("status"));
        let message = InteractionMessage::new(interaction.clone());

        message.reply("hello").await.unwrap();

        assert!(!interaction.sent()[0].ephemeral);
        assert_eq!(message.response_state().await, ResponseState::Acknowledged);
    }

    #[test]
    fn test_exposes_invocation_details() {
        let interaction =
            Arc::new(RecordingInteraction::in_guild("expire").with_option("ident", "abc"));
        let message = InteractionMessage::new(interaction);

        assert_eq!(message.command_name(), "expire");
        assert_eq!(message.group(), Some(GroupId(RecordingInteraction::GROUP_ID)));
        assert!(message.options().get("ident").is_some());
    }
}
