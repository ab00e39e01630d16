use super::GuildInfo;

/// Inbound text message as delivered by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub id: String,
    pub guild_id: String,
    pub channel_id: String,
    pub author_id: String,
    /// Set for any bot account. The dispatcher's self check compares
    /// `author_id` with the bot's own id instead, so other bots still reach
    /// command handling.
    pub author_is_bot: bool,
    pub content: String,
}

impl MessageEvent {
    pub fn new(
        guild_id: impl Into<String>,
        channel_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            guild_id: guild_id.into(),
            channel_id: channel_id.into(),
            author_id: author_id.into(),
            author_is_bot: false,
            content: content.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn from_bot(mut self, is_bot: bool) -> Self {
        self.author_is_bot = is_bot;
        self
    }
}

/// Events the dispatcher reacts to
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    GuildJoin(GuildInfo),
    Message(MessageEvent),
}

impl GatewayEvent {
    pub fn guild_id(&self) -> &str {
        match self {
            GatewayEvent::GuildJoin(guild) => &guild.id,
            GatewayEvent::Message(message) => &message.guild_id,
        }
    }
}
