use std::sync::Arc;

use crate::error::ApiResult;
use crate::foundation::{Member, Permission, PermissionView, PlatformUser, UserId};

use super::response::{Delivery, ResponseController};

/// The invoking user, as seen from the interaction's context.
#[derive(Clone)]
pub struct UserView {
    user: PlatformUser,
    member: Option<Member>,
    controller: Arc<ResponseController>,
}

impl UserView {
    /// Resolves the invoking user's membership in the originating group.
    pub(crate) fn new(controller: Arc<ResponseController>) -> Self {
        let interaction = controller.interaction();
        let user = interaction.user().clone();
        let member = interaction.guild().and_then(|g| g.member(user.id));
        Self {
            user,
            member,
            controller,
        }
    }

    pub fn id(&self) -> UserId {
        self.user.id
    }

    /// Returns the platform-global username.
    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Returns the group-scoped display name, or the username when no
    /// membership was resolved.
    pub fn display_name(&self) -> &str {
        self.member
            .as_ref()
            .map_or(self.user.username.as_str(), |m| m.display_name.as_str())
    }

    /// Returns the resolved group membership, if any.
    pub fn member(&self) -> Option<&Member> {
        self.member.as_ref()
    }

    /// Returns the user's permissions, or `None` outside a group.
    pub fn permissions(&self) -> Option<PermissionView> {
        self.member.as_ref().map(Member::permission_view)
    }

    /// Returns `true` if the user holds `permission` in the originating
    /// group. Always `false` without a resolved membership.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().is_some_and(|p| p.has(permission))
    }

    /// Sends `text` to this user privately where the context allows it.
    ///
    /// Equivalent to [`InteractionMessage::reply_privately`](super::InteractionMessage::reply_privately).
    pub async fn send_private(&self, text: &str) -> ApiResult<Delivery> {
        self.controller.reply_privately(text).await
    }
}

impl std::fmt::Debug for UserView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserView")
            .field("user", &self.user)
            .field("member", &self.member)
            .finish_non_exhaustive()
    }
}
