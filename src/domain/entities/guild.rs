use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-guild configuration record. One exists for every guild the bot has joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfiguration {
    pub guild_id: String,
    pub guild_name: String,
    pub prefix: String,
    pub bot_channels: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl GuildConfiguration {
    /// Fresh record for a guild seen for the first time
    pub fn new(guild: &GuildInfo, prefix: impl Into<String>) -> Self {
        Self {
            guild_id: guild.id.clone(),
            guild_name: guild.name.clone(),
            prefix: prefix.into(),
            bot_channels: guild.channel_ids.clone(),
            last_updated: Utc::now(),
        }
    }

    /// An empty allow-list places no restriction on channels.
    pub fn allows_channel(&self, channel_id: &str) -> bool {
        self.bot_channels.is_empty() || self.bot_channels.iter().any(|c| c == channel_id)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.touch()
    }

    pub fn with_bot_channels(mut self, channels: Vec<String>) -> Self {
        self.bot_channels = channels;
        self.touch()
    }

    pub fn with_guild_name(mut self, name: impl Into<String>) -> Self {
        self.guild_name = name.into();
        self.touch()
    }

    fn touch(mut self) -> Self {
        self.last_updated = Utc::now();
        self
    }
}

/// Guild as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildInfo {
    pub id: String,
    pub name: String,
    pub channel_ids: Vec<String>,
}

impl GuildInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            channel_ids: Vec::new(),
        }
    }

    pub fn with_channels(mut self, channels: Vec<String>) -> Self {
        self.channel_ids = channels;
        self
    }
}
