//! Guild configuration service - creates and mutates per-guild settings

use std::sync::Arc;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::{BotError, CommandError};
use crate::application::messaging::AdminGrant;
use crate::domain::entities::{GuildConfiguration, GuildInfo};
use crate::domain::traits::{Gateway, GuildStore};

static CHANNEL_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<#(\d+)>$").expect("channel mention pattern"));

/// Input limits applied to admin mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationPolicy {
    /// Longest accepted prefix, in characters
    pub max_prefix_len: usize,
    /// Shortest accepted channel id; platform ids are fixed-width snowflakes
    pub min_channel_id_len: usize,
}

impl Default for MutationPolicy {
    fn default() -> Self {
        Self {
            max_prefix_len: 2,
            min_channel_id_len: 18,
        }
    }
}

/// Loads, initializes and mutates guild configuration.
///
/// There is no cache: every call goes to the store. Mutations are not
/// serialized per guild, so concurrent writers race and the last upsert wins.
pub struct GuildConfigService {
    store: Arc<dyn GuildStore>,
    gateway: Arc<dyn Gateway>,
    policy: MutationPolicy,
}

impl GuildConfigService {
    pub fn new(store: Arc<dyn GuildStore>, gateway: Arc<dyn Gateway>, policy: MutationPolicy) -> Self {
        Self { store, gateway, policy }
    }

    pub fn policy(&self) -> MutationPolicy {
        self.policy
    }

    pub async fn load(&self, guild_id: &str) -> Result<GuildConfiguration, BotError> {
        self.store
            .find_by_guild_id(guild_id)
            .await?
            .ok_or_else(|| BotError::GuildNotConfigured(guild_id.to_string()))
    }

    /// Create the record for a newly joined guild. Existing records are left
    /// untouched. Returns whether a record was created.
    pub async fn initialize_guild(&self, guild: &GuildInfo, default_prefix: &str) -> Result<bool, BotError> {
        if self.store.find_by_guild_id(&guild.id).await?.is_some() {
            tracing::debug!(guild = %guild.id, "Guild already configured");
            return Ok(false);
        }

        tracing::info!(
            guild = %guild.id,
            "Guild {} not found, creating defaults with {} channels",
            guild.name,
            guild.channel_ids.len()
        );
        let config = GuildConfiguration::new(guild, default_prefix);
        self.store.upsert(&config).await?;
        Ok(true)
    }

    pub fn validate_prefix(&self, requested: &str) -> Result<(), CommandError> {
        if requested.is_empty() {
            return Err(CommandError::InvalidArgs("prefix must not be empty".to_string()));
        }
        if requested.chars().count() > self.policy.max_prefix_len {
            return Err(CommandError::PrefixTooLong {
                max: self.policy.max_prefix_len,
            });
        }
        Ok(())
    }

    /// Change the prefix and return the configuration as read back from the store.
    pub async fn set_prefix(&self, grant: &AdminGrant, requested: &str) -> Result<GuildConfiguration, BotError> {
        self.validate_prefix(requested)?;

        let current = self.load(grant.guild_id()).await?;
        let guild = self.gateway.fetch_guild(grant.guild_id()).await?;

        let updated = current.with_prefix(requested).with_guild_name(guild.name);
        self.store.upsert(&updated).await?;

        tracing::info!(guild = %grant.guild_id(), user = %grant.user_id(), "Prefix set to {}", requested);
        self.load(grant.guild_id()).await
    }

    /// Normalize channel tokens, failing on the first one that cannot be an id.
    pub fn validate_channels(&self, tokens: &[String]) -> Result<Vec<String>, CommandError> {
        tokens
            .iter()
            .map(|token| {
                let id = CHANNEL_MENTION
                    .captures(token)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str())
                    .unwrap_or(token.as_str());

                if id.len() < self.policy.min_channel_id_len {
                    tracing::debug!("Channel id {} shorter than {}", token, self.policy.min_channel_id_len);
                    return Err(CommandError::InvalidChannelId(token.clone()));
                }
                Ok(id.to_string())
            })
            .collect()
    }

    /// Replace the allow-list wholesale. With no tokens the list becomes the
    /// origin channel alone.
    pub async fn set_bot_channels(
        &self,
        grant: &AdminGrant,
        origin_channel: &str,
        tokens: &[String],
    ) -> Result<GuildConfiguration, BotError> {
        let channels = if tokens.is_empty() {
            vec![origin_channel.to_string()]
        } else {
            self.validate_channels(tokens)?
        };

        let current = self.load(grant.guild_id()).await?;
        let updated = current.with_bot_channels(channels);
        self.store.upsert(&updated).await?;

        tracing::info!(
            guild = %grant.guild_id(),
            user = %grant.user_id(),
            "Bot channels set to {}",
            updated.bot_channels.join(",")
        );
        self.load(grant.guild_id()).await
    }
}
