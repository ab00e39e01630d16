//! Discord adapter
//!
//! Outbound calls go through the HTTP API. Inbound events are gateway dispatch
//! payloads handed over by the session that owns the websocket connection.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::{Capability, GatewayEvent, GuildInfo, MessageEvent, Reply};
use crate::domain::traits::{BotInfo, Gateway, PermissionOracle};

/// Discord API base URL
pub const API_BASE: &str = "https://discord.com/api/v10";

/// ADMINISTRATOR permission bit
const ADMINISTRATOR: u64 = 1 << 3;

/// Gateway dispatch envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Dispatch {
    pub t: Option<String>,
    #[serde(default)]
    pub d: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Channel {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Role {
    pub id: String,
    /// Bitset serialized as a decimal string
    pub permissions: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Member {
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub author: User,
    #[serde(default)]
    pub content: String,
}

impl From<Guild> for GuildInfo {
    fn from(guild: Guild) -> Self {
        GuildInfo::new(guild.id, guild.name)
            .with_channels(guild.channels.into_iter().map(|c| c.id).collect())
    }
}

/// Whether `user_id` is the guild owner or holds a role granting ADMINISTRATOR.
/// The @everyone role shares the guild's id and applies to every member.
pub fn is_administrator(guild: &Guild, member: &Member, user_id: &str) -> bool {
    if guild.owner_id.as_deref() == Some(user_id) {
        return true;
    }

    let permissions = guild
        .roles
        .iter()
        .filter(|role| role.id == guild.id || member.roles.contains(&role.id))
        .filter_map(|role| role.permissions.parse::<u64>().ok())
        .fold(0, |acc, bits| acc | bits);

    permissions & ADMINISTRATOR != 0
}

/// Discord bot adapter
pub struct DiscordAdapter {
    token: String,
    api_base: String,
    client: Client,
    info: BotInfo,
}

impl DiscordAdapter {
    pub fn new(token: impl Into<String>, api_base: Option<String>) -> Self {
        Self {
            token: token.into(),
            api_base: api_base.unwrap_or_else(|| API_BASE.to_string()),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "guild-bot".to_string(),
            },
        }
    }

    /// Build an API URL, percent-encoding each path segment
    fn api_url(&self, segments: &[&str]) -> Result<Url, BotError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| BotError::Internal(format!("Invalid API base {}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| BotError::Internal(format!("API base {} cannot be a base", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, BotError> {
        let url = self.api_url(segments)?;
        Ok(self
            .client
            .request(method, url)
            .header("Authorization", format!("Bot {}", self.token))
            .header("User-Agent", "DiscordBot (guild-bot, 0.1)"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BotError> {
        let response = request
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(BotError::Auth("Discord rejected the bot token".to_string())),
            StatusCode::FORBIDDEN => Err(BotError::PermissionDenied(response.url().path().to_string())),
            StatusCode::NOT_FOUND => Err(BotError::NotFound(response.url().path().to_string())),
            status => {
                let error = response.text().await.unwrap_or_default();
                Err(BotError::Network(format!("Discord API error {}: {}", status, error)))
            }
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Result<T, BotError> {
        let response = self.send(self.request(Method::GET, segments)?).await?;
        response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))
    }

    /// Fetch the bot's own identity. Fails on a bad token.
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        let user: User = self.get_json(&["users", "@me"]).await?;
        self.info = BotInfo {
            id: user.id,
            name: user.username,
        };
        Ok(())
    }

    async fn get_guild(&self, guild_id: &str) -> Result<Guild, BotError> {
        self.get_json(&["guilds", guild_id]).await
    }

    async fn get_member(&self, guild_id: &str, user_id: &str) -> Result<Member, BotError> {
        self.get_json(&["guilds", guild_id, "members", user_id]).await
    }

    /// Translate one dispatch payload. Unrelated dispatch types and direct
    /// messages yield `None`.
    pub fn parse_dispatch(line: &str) -> Result<Option<GatewayEvent>, BotError> {
        let dispatch: Dispatch = serde_json::from_str(line)
            .map_err(|e| BotError::Parse(format!("Invalid dispatch payload: {}", e)))?;

        let event = match dispatch.t.as_deref() {
            Some("GUILD_CREATE") => {
                let guild: Guild = serde_json::from_value(dispatch.d)
                    .map_err(|e| BotError::Parse(format!("GUILD_CREATE: {}", e)))?;
                Some(GatewayEvent::GuildJoin(guild.into()))
            }
            Some("MESSAGE_CREATE") => {
                let message: Message = serde_json::from_value(dispatch.d)
                    .map_err(|e| BotError::Parse(format!("MESSAGE_CREATE: {}", e)))?;
                message.guild_id.map(|guild_id| {
                    GatewayEvent::Message(
                        MessageEvent::new(guild_id, message.channel_id, message.author.id, message.content)
                            .with_id(message.id)
                            .from_bot(message.author.bot),
                    )
                })
            }
            _ => None,
        };
        Ok(event)
    }
}

#[async_trait]
impl Gateway for DiscordAdapter {
    async fn send_reply(&self, channel_id: &str, reply: &Reply) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct Embed<'a> {
            description: &'a str,
            color: u32,
        }

        #[derive(Serialize)]
        struct CreateMessage<'a> {
            embeds: Vec<Embed<'a>>,
        }

        #[derive(Deserialize)]
        struct Created {
            id: String,
        }

        let body = CreateMessage {
            embeds: vec![Embed {
                description: &reply.description,
                color: reply.color,
            }],
        };
        let request = self
            .request(Method::POST, &["channels", channel_id, "messages"])?
            .json(&body);

        let created: Created = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        tracing::debug!(channel = %channel_id, "Sent reply {}", created.id);
        Ok(created.id)
    }

    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<(), BotError> {
        let request = self
            .request(
                Method::PUT,
                &["channels", channel_id, "messages", message_id, "reactions", emoji, "@me"],
            )?
            .header("Content-Length", "0");
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<GuildInfo, BotError> {
        Ok(self.get_guild(guild_id).await?.into())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[async_trait]
impl PermissionOracle for DiscordAdapter {
    async fn has_capability(&self, guild_id: &str, user_id: &str, capability: Capability) -> Result<bool, BotError> {
        match capability {
            Capability::Administrator => {
                let guild = self.get_guild(guild_id).await?;
                let member = self.get_member(guild_id, user_id).await?;
                Ok(is_administrator(&guild, &member, user_id))
            }
        }
    }
}
