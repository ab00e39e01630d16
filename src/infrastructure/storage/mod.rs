//! In-memory guild store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::entities::GuildConfiguration;
use crate::domain::traits::GuildStore;

/// Guild store kept in process memory. Contents are lost on exit.
#[derive(Default, Clone)]
pub struct MemoryGuildStore {
    guilds: Arc<RwLock<HashMap<String, GuildConfiguration>>>,
}

impl MemoryGuildStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.guilds.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.guilds.read().await.is_empty()
    }
}

#[async_trait]
impl GuildStore for MemoryGuildStore {
    async fn find_by_guild_id(&self, guild_id: &str) -> Result<Option<GuildConfiguration>, StorageError> {
        let guilds = self.guilds.read().await;
        Ok(guilds.get(guild_id).cloned())
    }

    async fn upsert(&self, config: &GuildConfiguration) -> Result<(), StorageError> {
        let mut guilds = self.guilds.write().await;
        guilds.insert(config.guild_id.clone(), config.clone());
        Ok(())
    }
}
