use crate::foundation::{GroupId, Permission, PlatformChannel};
use crate::integration::Interaction;

use super::user::UserView;

/// Permissions that make a user an operator of a group's channels.
pub const OPERATOR_PERMISSIONS: [Permission; 2] =
    [Permission::Administrator, Permission::ManageGuild];

/// Permissions that let a non-operator speak to the bot.
pub const VOICE_PERMISSIONS: [Permission; 2] =
    [Permission::ManageMessages, Permission::ModerateMembers];

/// Name reported for interactions without a group channel.
pub const DIRECT_MESSAGE_NAME: &str = "Direct Message";

/// The channel an interaction came from, plus its moderation rules.
///
/// Direct messages have no moderation concept: outside a group every user is
/// an operator and may speak.
#[derive(Debug, Clone)]
pub struct ChannelView {
    channel: Option<PlatformChannel>,
    group: Option<GroupId>,
}

impl ChannelView {
    pub(crate) fn new(interaction: &dyn Interaction) -> Self {
        Self {
            channel: interaction.channel().cloned(),
            group: interaction.guild().map(|g| g.id()),
        }
    }

    /// Returns the originating group, if any.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Returns the raw platform channel, if any.
    pub fn channel(&self) -> Option<&PlatformChannel> {
        self.channel.as_ref()
    }

    /// Returns `true` for interactions without a group context.
    pub fn is_direct(&self) -> bool {
        self.group.is_none()
    }

    /// Returns a display name: `#name`, the channel mention when unnamed, or
    /// [`DIRECT_MESSAGE_NAME`].
    pub fn name(&self) -> String {
        match &self.channel {
            Some(channel) if !channel.is_direct() => match &channel.name {
                Some(name) => format!("#{name}"),
                None => channel.id.to_string(),
            },
            _ => DIRECT_MESSAGE_NAME.to_string(),
        }
    }

    /// Returns `true` if `user` may administrate jobs from this channel.
    pub fn is_operator(&self, user: &UserView) -> bool {
        if self.group.is_none() {
            return true;
        }
        OPERATOR_PERMISSIONS.iter().any(|p| user.has_permission(*p))
    }

    /// Returns `true` if `user` may issue commands from this channel.
    ///
    /// Every operator can speak; moderators can speak without being
    /// operators.
    pub fn can_speak(&self, user: &UserView) -> bool {
        if self.group.is_none() {
            return true;
        }
        self.is_operator(user) || VOICE_PERMISSIONS.iter().any(|p| user.has_permission(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Member, Permissions};
    use crate::message::InteractionMessage;
    use crate::testing::RecordingInteraction;
    use std::sync::Arc;

    fn message(interaction: RecordingInteraction) -> InteractionMessage {
        InteractionMessage::new(Arc::new(interaction))
    }

    fn member_with(permissions: &[Permission]) -> Member {
        Member::new("Member", permissions.iter().copied().collect::<Permissions>())
    }

    #[test]
    fn test_names() {
        assert_eq!(message(RecordingInteraction::in_guild("x")).channel().name(), "#archivebot");
        assert_eq!(message(RecordingInteraction::direct("x")).channel().name(), "Direct Message");

        let unnamed = PlatformChannel {
            name: None,
            ..PlatformChannel::text(55, "")
        };
        let msg = message(RecordingInteraction::in_guild("x").with_channel(Some(unnamed)));
        assert_eq!(msg.channel().name(), "<#55>");

        let dm = message(
            RecordingInteraction::direct("x").with_channel(Some(PlatformChannel::direct(9))),
        );
        assert_eq!(dm.channel().name(), "Direct Message");
    }

    #[test]
    fn test_direct_means_no_group() {
        assert!(message(RecordingInteraction::direct("x")).channel().is_direct());

        let channelless = message(RecordingInteraction::in_guild("x").with_channel(None));
        assert!(!channelless.channel().is_direct());
        assert!(!channelless.channel().is_operator(channelless.user()));
        assert_eq!(channelless.channel().name(), DIRECT_MESSAGE_NAME);
    }

    #[test]
    fn test_everyone_is_operator_without_group() {
        let msg = message(RecordingInteraction::direct("x"));
        assert!(msg.channel().is_operator(msg.user()));
        assert!(msg.channel().can_speak(msg.user()));
    }

    #[test]
    fn test_plain_member_has_no_rights() {
        let msg = message(RecordingInteraction::in_guild("x"));
        assert!(!msg.channel().is_operator(msg.user()));
        assert!(!msg.channel().can_speak(msg.user()));
    }

    #[test]
    fn test_operator_permissions() {
        for permission in OPERATOR_PERMISSIONS {
            let msg = message(
                RecordingInteraction::in_guild("x").with_member(member_with(&[permission])),
            );
            assert!(msg.channel().is_operator(msg.user()), "{permission}");
            assert!(msg.channel().can_speak(msg.user()), "{permission}");
        }
    }

    #[test]
    fn test_moderators_speak_without_operating() {
        for permission in VOICE_PERMISSIONS {
            let msg = message(
                RecordingInteraction::in_guild("x").with_member(member_with(&[permission])),
            );
            assert!(!msg.channel().is_operator(msg.user()), "{permission}");
            assert!(msg.channel().can_speak(msg.user()), "{permission}");
        }
    }

    #[test]
    fn test_can_speak_covers_operator_for_all_combinations() {
        let pool = [
            Permission::Administrator,
            Permission::ManageGuild,
            Permission::ManageMessages,
            Permission::ModerateMembers,
            Permission::KickMembers,
        ];
        for mask in 0u32..(1 << pool.len()) {
            let granted: Vec<_> = pool
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, p)| *p)
                .collect();
            let msg = message(RecordingInteraction::in_guild("x").with_member(member_with(&granted)));
            if msg.channel().is_operator(msg.user()) {
                assert!(msg.channel().can_speak(msg.user()), "{granted:?}");
            }
        }
    }

    #[test]
    fn test_group_without_membership_denies() {
        let msg = message(RecordingInteraction::in_guild("x").without_member());
        assert!(!msg.channel().is_operator(msg.user()));
        assert!(!msg.channel().can_speak(msg.user()));
    }
}
