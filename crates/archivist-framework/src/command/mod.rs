//! Command descriptors and their registration with the platform.
//!
//! A [`CommandDescriptor`] is built once at startup and handed to a
//! [`CommandRegistry`], which validates it and makes one platform call per
//! target in the [`CommandScope`].

mod descriptor;
mod registry;

pub use descriptor::{CommandDescriptor, OptionSpec};
pub use registry::{CommandRegistrar, CommandRegistry, CommandScope};
