//! Console adapter for development/testing

use async_trait::async_trait;
use crate::application::errors::BotError;
use crate::domain::entities::{Capability, GatewayEvent, GuildInfo, MessageEvent, Reply};
use crate::domain::traits::{BotInfo, Gateway, PermissionOracle};

pub const CONSOLE_GUILD_ID: &str = "100000000000000000";
pub const CONSOLE_CHANNEL_ID: &str = "100000000000000001";
pub const CONSOLE_USER_ID: &str = "console-user";

/// Console bot adapter for local development. Simulates a single guild with
/// one channel and one user.
pub struct ConsoleAdapter {
    info: BotInfo,
    admin: bool,
}

impl ConsoleAdapter {
    pub fn new(admin: bool) -> Self {
        Self {
            info: BotInfo {
                id: "console-bot".to_string(),
                name: "guild-bot".to_string(),
            },
            admin,
        }
    }

    pub fn guild(&self) -> GuildInfo {
        GuildInfo::new(CONSOLE_GUILD_ID, "Console").with_channels(vec![CONSOLE_CHANNEL_ID.to_string()])
    }

    /// The join event the console guild starts with
    pub fn join_event(&self) -> GatewayEvent {
        GatewayEvent::GuildJoin(self.guild())
    }

    /// Turn a typed line into a message from the console user
    pub fn message_event(&self, line: &str) -> GatewayEvent {
        GatewayEvent::Message(MessageEvent::new(
            CONSOLE_GUILD_ID,
            CONSOLE_CHANNEL_ID,
            CONSOLE_USER_ID,
            line.trim(),
        ))
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl Gateway for ConsoleAdapter {
    async fn send_reply(&self, _channel_id: &str, reply: &Reply) -> Result<String, BotError> {
        let marker = if reply.is_failure() { "!" } else { "+" };
        println!("[BOT {}] {}", marker, reply.description);
        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn add_reaction(&self, _channel_id: &str, _message_id: &str, emoji: &str) -> Result<(), BotError> {
        println!("[BOT reacted] {}", emoji);
        Ok(())
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<GuildInfo, BotError> {
        if guild_id == CONSOLE_GUILD_ID {
            Ok(self.guild())
        } else {
            Err(BotError::NotFound(format!("guild {}", guild_id)))
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[async_trait]
impl PermissionOracle for ConsoleAdapter {
    async fn has_capability(&self, _guild_id: &str, user_id: &str, _capability: Capability) -> Result<bool, BotError> {
        Ok(self.admin && user_id == CONSOLE_USER_ID)
    }
}
