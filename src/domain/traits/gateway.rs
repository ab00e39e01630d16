use async_trait::async_trait;
use crate::domain::entities::{GuildInfo, Reply};
use crate::application::errors::BotError;

/// Gateway trait - abstraction over the chat platform's outbound surface
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send a formatted reply to a channel, returning the new message id
    async fn send_reply(&self, channel_id: &str, reply: &Reply) -> Result<String, BotError>;

    /// React to an existing message
    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<(), BotError>;

    /// Look up the current state of a guild
    async fn fetch_guild(&self, guild_id: &str) -> Result<GuildInfo, BotError>;

    /// Identity of the bot account
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}
