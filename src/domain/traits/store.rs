use async_trait::async_trait;
use crate::application::errors::StorageError;
use crate::domain::entities::GuildConfiguration;

/// GuildStore trait - persistence for per-guild configuration
#[async_trait]
pub trait GuildStore: Send + Sync {
    async fn find_by_guild_id(&self, guild_id: &str) -> Result<Option<GuildConfiguration>, StorageError>;

    /// Insert the record, or replace the one with the same guild id
    async fn upsert(&self, config: &GuildConfiguration) -> Result<(), StorageError>;
}
