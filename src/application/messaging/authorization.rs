//! Authorization gate - Single capability check in front of privileged commands

use std::sync::Arc;
use crate::application::errors::BotError;
use crate::domain::entities::{Capability, CommandInvocation};
use crate::domain::traits::PermissionOracle;

/// Proof that a user passed the capability check for a guild.
///
/// Only the gate constructs these outside of tests, and every configuration
/// mutation takes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminGrant {
    guild_id: String,
    user_id: String,
    capability: Capability,
}

impl AdminGrant {
    pub(crate) fn new(guild_id: impl Into<String>, user_id: impl Into<String>, capability: Capability) -> Self {
        Self {
            guild_id: guild_id.into(),
            user_id: user_id.into(),
            capability,
        }
    }

    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }
}

pub struct AuthorizationGate {
    oracle: Arc<dyn PermissionOracle>,
}

impl AuthorizationGate {
    pub fn new(oracle: Arc<dyn PermissionOracle>) -> Self {
        Self { oracle }
    }

    /// Check the invoking user against `capability`.
    ///
    /// `Ok(None)` means denied. An oracle failure is returned as an error and
    /// is neither an allow nor a deny.
    pub async fn authorize(
        &self,
        invocation: &CommandInvocation,
        capability: Capability,
    ) -> Result<Option<AdminGrant>, BotError> {
        let allowed = self
            .oracle
            .has_capability(&invocation.guild_id, &invocation.user_id, capability)
            .await?;

        if !allowed {
            tracing::debug!(
                guild = %invocation.guild_id,
                user = %invocation.user_id,
                "{} lacks {} for {}",
                invocation.user_id,
                capability,
                invocation.command
            );
            return Ok(None);
        }

        Ok(Some(AdminGrant::new(
            invocation.guild_id.clone(),
            invocation.user_id.clone(),
            capability,
        )))
    }
}
