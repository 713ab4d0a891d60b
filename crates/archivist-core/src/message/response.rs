//! The response state machine.
//!
//! A platform interaction accepts exactly one initial response. Everything
//! after that must go out as a followup. [`ResponseController`] hides this
//! rule from callers: they call [`reply`](ResponseController::reply) as often
//! as they like and the controller picks the call shape.
//!
//! ```text
//!               reply()                      reply()
//! Unacknowledged ──────▶ initial response ──▶ Acknowledged ──────▶ followup
//!                                                  │                (or plain
//!                                                  └───────────────  response)
//! ```
//!
//! The read-decide-send step for the initial response runs under an async
//! mutex, so concurrent callers on the same interaction never race two
//! initial responses. Followups are sent after the lock is released.

use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::error::ApiResult;
use crate::integration::BoxedInteraction;

/// Acknowledgment state of one interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseState {
    /// No initial response has been sent yet.
    #[default]
    Unacknowledged,
    /// The initial response went out; every further reply is a followup.
    Acknowledged,
}

impl ResponseState {
    pub fn is_acknowledged(self) -> bool {
        self == Self::Acknowledged
    }
}

/// The call shape a reply was delivered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Sent as the interaction's initial response.
    Initial,
    /// Sent through the dedicated followup capability.
    Followup,
    /// The transport has no followup capability; sent as a plain response
    /// with privacy dropped.
    FallbackResponse,
}

/// Decides, per reply, between initial response and followup.
pub struct ResponseController {
    interaction: BoxedInteraction,
    state: Mutex<ResponseState>,
}

impl ResponseController {
    /// Creates a controller for a freshly received interaction.
    pub fn new(interaction: BoxedInteraction) -> Self {
        Self {
            interaction,
            state: Mutex::new(ResponseState::Unacknowledged),
        }
    }

    /// Returns the underlying interaction handle.
    pub fn interaction(&self) -> &BoxedInteraction {
        &self.interaction
    }

    /// Returns `true` if private replies are meaningful here.
    ///
    /// Privacy only exists inside a group; a direct message is already
    /// private and the platform rejects the ephemeral flag there.
    pub fn supports_private(&self) -> bool {
        self.interaction.guild().is_some()
    }

    /// Returns the internally tracked state.
    pub async fn state(&self) -> ResponseState {
        *self.state.lock().await
    }

    /// Sends `text`, as the initial response if nothing has been sent yet and
    /// as a followup otherwise.
    ///
    /// Performs exactly one platform call. Platform errors are returned
    /// as-is; a failed initial response leaves the state unacknowledged.
    pub async fn reply(&self, text: &str, ephemeral: bool) -> ApiResult<Delivery> {
        let mut state = self.state.lock().await;

        // Handles that do not track acknowledgment count as "not yet answered".
        let platform_acknowledged = self.interaction.acknowledgement().unwrap_or(false);

        if !state.is_acknowledged() && !platform_acknowledged {
            self.interaction.respond(text, ephemeral).await?;
            *state = ResponseState::Acknowledged;
            debug!(
                interaction_id = %self.interaction.id(),
                ephemeral,
                "Sent initial response"
            );
            return Ok(Delivery::Initial);
        }

        *state = ResponseState::Acknowledged;
        drop(state);

        match self.interaction.followup() {
            Some(followup) => {
                followup.send_followup(text, ephemeral).await?;
                trace!(interaction_id = %self.interaction.id(), ephemeral, "Sent followup");
                Ok(Delivery::Followup)
            }
            None => {
                if ephemeral {
                    warn!(
                        interaction_id = %self.interaction.id(),
                        "No followup capability; sending private reply publicly"
                    );
                }
                self.interaction.respond(text, false).await?;
                Ok(Delivery::FallbackResponse)
            }
        }
    }

    /// Sends `text` privately where the context allows it, publicly otherwise.
    pub async fn reply_privately(&self, text: &str) -> ApiResult<Delivery> {
        self.reply(text, self.supports_private()).await
    }
}

impl std::fmt::Debug for ResponseController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseController")
            .field("interaction_id", &self.interaction.id())
            .finish_non_exhaustive()
    }
}
