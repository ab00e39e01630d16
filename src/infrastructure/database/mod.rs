//! SQLite guild store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::entities::GuildConfiguration;
use crate::domain::traits::GuildStore;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        let db = Self { conn: Mutex::new(conn) };
        db.init_tables()?;
        Ok(db)
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Serialization("Connection lock poisoned".to_string()))
    }

    fn init_tables(&self) -> Result<(), StorageError> {
        self.conn()?.execute(
            "CREATE TABLE IF NOT EXISTS guild_settings (
                guild_id TEXT PRIMARY KEY NOT NULL,
                guild_name TEXT NOT NULL DEFAULT '',
                prefix TEXT NOT NULL,
                bot_channels TEXT NOT NULL DEFAULT '[]',
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get_guild(&self, guild_id: &str) -> Result<Option<GuildConfiguration>, StorageError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT guild_id, guild_name, prefix, bot_channels, updated_at
                 FROM guild_settings WHERE guild_id = ?1",
                [guild_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((guild_id, guild_name, prefix, channels, updated_at)) = row else {
            return Ok(None);
        };

        let bot_channels: Vec<String> = serde_json::from_str(&channels)
            .map_err(|e| StorageError::Serialization(format!("bot_channels: {}", e)))?;
        let last_updated = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| StorageError::Serialization(format!("updated_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(Some(GuildConfiguration {
            guild_id,
            guild_name,
            prefix,
            bot_channels,
            last_updated,
        }))
    }

    pub fn put_guild(&self, config: &GuildConfiguration) -> Result<(), StorageError> {
        let channels = serde_json::to_string(&config.bot_channels)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.conn()?.execute(
            "INSERT INTO guild_settings (guild_id, guild_name, prefix, bot_channels, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(guild_id) DO UPDATE SET
                guild_name = excluded.guild_name,
                prefix = excluded.prefix,
                bot_channels = excluded.bot_channels,
                updated_at = excluded.updated_at",
            rusqlite::params![
                &config.guild_id,
                &config.guild_name,
                &config.prefix,
                channels,
                config.last_updated.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn count_guilds(&self) -> Result<i64, StorageError> {
        let count = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM guild_settings", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[async_trait]
impl GuildStore for Database {
    async fn find_by_guild_id(&self, guild_id: &str) -> Result<Option<GuildConfiguration>, StorageError> {
        self.get_guild(guild_id)
    }

    async fn upsert(&self, config: &GuildConfiguration) -> Result<(), StorageError> {
        self.put_guild(config)
    }
}
