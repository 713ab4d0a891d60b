use std::collections::HashSet;
use std::sync::Arc;

use archivist_core::{ApiResult, GroupId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::CommandDescriptor;
use crate::error::{RegistryError, RegistryResult};

/// Where a command is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandScope {
    /// Available everywhere the application is installed.
    #[default]
    Global,
    /// Registered separately in each listed group.
    Groups(Vec<GroupId>),
}

impl CommandScope {
    /// Builds a scope from a list of group ids. An empty list means global.
    pub fn groups(ids: impl IntoIterator<Item = GroupId>) -> Self {
        let ids: Vec<_> = ids.into_iter().collect();
        if ids.is_empty() {
            Self::Global
        } else {
            Self::Groups(ids)
        }
    }

    /// Returns one registration target per platform call. `None` is the
    /// unqualified, global target.
    pub fn targets(&self) -> Vec<Option<GroupId>> {
        match self {
            Self::Groups(ids) if !ids.is_empty() => ids.iter().copied().map(Some).collect(),
            _ => vec![None],
        }
    }

    pub fn is_global(&self) -> bool {
        self.targets() == [None]
    }
}

/// The platform call that makes a command available.
#[async_trait]
pub trait CommandRegistrar: Send + Sync {
    /// Registers `descriptor` globally (`group == None`) or in one group.
    async fn register_command(
        &self,
        descriptor: &CommandDescriptor,
        group: Option<GroupId>,
    ) -> ApiResult<()>;
}

#[async_trait]
impl<R: CommandRegistrar + ?Sized> CommandRegistrar for &R {
    async fn register_command(
        &self,
        descriptor: &CommandDescriptor,
        group: Option<GroupId>,
    ) -> ApiResult<()> {
        (**self).register_command(descriptor, group).await
    }
}

#[async_trait]
impl<R: CommandRegistrar + ?Sized> CommandRegistrar for Arc<R> {
    async fn register_command(
        &self,
        descriptor: &CommandDescriptor,
        group: Option<GroupId>,
    ) -> ApiResult<()> {
        (**self).register_command(descriptor, group).await
    }
}

/// Validates command descriptors and registers them through a
/// [`CommandRegistrar`].
pub struct CommandRegistry<R> {
    registrar: R,
}

impl<R: CommandRegistrar> CommandRegistry<R> {
    pub fn new(registrar: R) -> Self {
        Self { registrar }
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    /// Registers one command in `scope`.
    ///
    /// Returns the number of platform calls made. The first failing call
    /// aborts the registration.
    pub async fn register(
        &self,
        descriptor: &CommandDescriptor,
        scope: &CommandScope,
    ) -> RegistryResult<usize> {
        descriptor.validate()?;

        let targets = scope.targets();
        for group in &targets {
            self.registrar
                .register_command(descriptor, *group)
                .await
                .map_err(|source| RegistryError::Registration {
                    command: descriptor.name().to_string(),
                    source,
                })?;
            debug!(command = descriptor.name(), group = ?group, "Registered command");
        }
        Ok(targets.len())
    }

    /// Registers every descriptor in `scope`, rejecting duplicate names
    /// before any platform call is made.
    pub async fn register_all(
        &self,
        descriptors: &[CommandDescriptor],
        scope: &CommandScope,
    ) -> RegistryResult<usize> {
        let mut names = HashSet::new();
        for descriptor in descriptors {
            descriptor.validate()?;
            if !names.insert(descriptor.name()) {
                return Err(RegistryError::invalid(
                    descriptor.name(),
                    "command name registered twice",
                ));
            }
        }

        let mut calls = 0;
        for descriptor in descriptors {
            calls += self.register(descriptor, scope).await?;
        }
        info!(
            commands = descriptors.len(),
            calls,
            global = scope.is_global(),
            "Commands registered"
        );
        Ok(calls)
    }
}
