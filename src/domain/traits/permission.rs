use async_trait::async_trait;
use crate::domain::entities::Capability;
use crate::application::errors::BotError;

/// Answers whether a guild member holds a capability
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    async fn has_capability(&self, guild_id: &str, user_id: &str, capability: Capability) -> Result<bool, BotError>;
}
