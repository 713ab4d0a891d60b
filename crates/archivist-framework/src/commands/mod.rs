//! The built-in command set.
//!
//! [`catalog`] lists what gets registered with the platform and [`catalog_router`]
//! binds a handler to each of those names. Handlers pull their options,
//! resolve the job when the command takes an `ident`, and make exactly one
//! orchestrator call.

mod catalog;
mod handlers;

pub use catalog::{catalog, catalog_router};
pub use handlers::STATUS_PROMPT;
