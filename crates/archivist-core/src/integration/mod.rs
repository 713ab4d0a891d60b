//! Integration layer: the interface gateways implement.

pub mod interaction;

pub use interaction::{BoxedInteraction, FollowupCapability, Guild, Interaction};
