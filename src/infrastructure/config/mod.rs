//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::application::services::MutationPolicy;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    pub storage: StorageConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    /// Prefix given to guilds on first join
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LimitsConfig {
    pub max_prefix_length: usize,
    pub min_channel_id_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let policy = MutationPolicy::default();
        Self {
            max_prefix_length: policy.max_prefix_len,
            min_channel_id_length: policy.min_channel_id_len,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub discord: Option<DiscordConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    pub enabled: bool,
    pub token: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Whether the local console user counts as a guild administrator
    pub admin: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "guild-bot".to_string(),
                prefix: "!".to_string(),
            },
            limits: LimitsConfig::default(),
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                path: PathBuf::from("guild-bot.db"),
            },
            adapters: AdaptersConfig {
                discord: Some(DiscordConfig {
                    enabled: false,
                    token: None,
                    api_base: None,
                }),
                console: Some(ConsoleConfig {
                    enabled: true,
                    admin: true,
                }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise defaults; env overrides apply to
    /// both. A file that exists but fails to parse or validate is an error.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::load_env());
        }

        let mut config = Self::load(&path)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment overrides: BOT_TOKEN, BOT_PREFIX, BOT_DATABASE
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.set_token(token);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(path) = std::env::var("BOT_DATABASE") {
            self.storage.path = PathBuf::from(path);
        }
    }

    /// Set the Discord token, enabling the adapter
    pub fn set_token(&mut self, token: String) {
        let discord = self.adapters.discord.get_or_insert(DiscordConfig {
            enabled: true,
            token: None,
            api_base: None,
        });
        discord.token = Some(token);
        discord.enabled = true;
    }

    /// Token of the Discord adapter when it is enabled
    pub fn discord_token(&self) -> Option<&str> {
        self.adapters
            .discord
            .as_ref()
            .filter(|d| d.enabled)
            .and_then(|d| d.token.as_deref())
    }

    pub fn mutation_policy(&self) -> MutationPolicy {
        MutationPolicy {
            max_prefix_len: self.limits.max_prefix_length,
            min_channel_id_len: self.limits.min_channel_id_length,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::MissingField("bot.prefix".to_string()));
        }
        if self.bot.prefix.chars().count() > self.limits.max_prefix_length {
            return Err(ConfigError::InvalidValue(format!(
                "bot.prefix `{}` is longer than limits.max-prefix-length ({})",
                self.bot.prefix, self.limits.max_prefix_length
            )));
        }
        Ok(())
    }
}
