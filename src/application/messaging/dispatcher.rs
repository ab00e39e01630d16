//! Dispatcher - Routes gateway events through configuration, eligibility and
//! authorization to command handlers

use std::sync::Arc;
use tokio::task::JoinHandle;
use crate::application::errors::BotError;
use crate::application::services::commands::default_registry;
use crate::application::services::{
    CommandContext, CommandOutput, CommandRegistry, GuildConfigService, MutationPolicy,
};
use crate::domain::entities::{GatewayEvent, GuildInfo, MessageEvent};
use crate::domain::traits::{Gateway, GuildStore, PermissionOracle};
use super::authorization::AuthorizationGate;
use super::parser::InvocationParser;

/// Stateless between events: configuration is reloaded from the store every time.
pub struct Dispatcher {
    gateway: Arc<dyn Gateway>,
    config: Arc<GuildConfigService>,
    gate: AuthorizationGate,
    registry: CommandRegistry,
    parser: InvocationParser,
    default_prefix: String,
}

impl Dispatcher {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        config: Arc<GuildConfigService>,
        gate: AuthorizationGate,
        registry: CommandRegistry,
        default_prefix: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            config,
            gate,
            registry,
            parser: InvocationParser::new(),
            default_prefix: default_prefix.into(),
        }
    }

    /// Dispatcher with the built-in command table
    pub fn with_defaults(
        store: Arc<dyn GuildStore>,
        gateway: Arc<dyn Gateway>,
        oracle: Arc<dyn PermissionOracle>,
        policy: MutationPolicy,
        default_prefix: impl Into<String>,
    ) -> Self {
        let config = Arc::new(GuildConfigService::new(store, gateway.clone(), policy));
        let registry = default_registry(config.clone());
        Self::new(gateway, config, AuthorizationGate::new(oracle), registry, default_prefix)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, event: &GatewayEvent) -> Result<(), BotError> {
        match event {
            GatewayEvent::GuildJoin(guild) => self.on_guild_join(guild).await,
            GatewayEvent::Message(message) => self.on_message(message).await,
        }
    }

    /// Create the guild's configuration with defaults if it has none yet
    pub async fn on_guild_join(&self, guild: &GuildInfo) -> Result<(), BotError> {
        if self.config.initialize_guild(guild, &self.default_prefix).await? {
            tracing::info!(guild = %guild.id, "Initialized guild {}", guild.name);
        }
        Ok(())
    }

    pub async fn on_message(&self, message: &MessageEvent) -> Result<(), BotError> {
        let config = self.config.load(&message.guild_id).await?;

        // Self check is by id; `author_is_bot` alone would also silence other bots
        if message.author_id == self.gateway.bot_info().id {
            return Ok(());
        }

        if !config.allows_channel(&message.channel_id) {
            tracing::trace!(guild = %message.guild_id, channel = %message.channel_id, "Channel not allowed");
            return Ok(());
        }

        let Some(invocation) = self.parser.parse(&config.prefix, message) else {
            return Ok(());
        };

        let Some(command) = self.registry.find(&invocation.command) else {
            tracing::debug!(guild = %message.guild_id, "Unknown command: {}", invocation.command);
            return Ok(());
        };

        let grant = match command.required_capability(&invocation) {
            Some(capability) => match self.gate.authorize(&invocation, capability).await? {
                Some(grant) => Some(grant),
                None => return Ok(()),
            },
            None => None,
        };

        let ctx = CommandContext {
            invocation: &invocation,
            config: &config,
            grant: grant.as_ref(),
            registry: &self.registry,
        };
        let output = command.execute(&ctx).await?;

        self.deliver(message, output).await
    }

    async fn deliver(&self, message: &MessageEvent, output: CommandOutput) -> Result<(), BotError> {
        if let Some(reply) = &output.reply {
            self.gateway.send_reply(&message.channel_id, reply).await?;
        }
        if let Some(emoji) = &output.reaction {
            self.gateway
                .add_reaction(&message.channel_id, &message.id, emoji)
                .await?;
        }
        Ok(())
    }
}

/// Handle one event on its own task. Failures are logged and end only that event.
pub fn spawn_event(dispatcher: Arc<Dispatcher>, event: GatewayEvent) -> JoinHandle<()> {
    tokio::spawn(async move {
        match dispatcher.dispatch(&event).await {
            Ok(()) => {}
            Err(BotError::GuildNotConfigured(guild_id)) => {
                tracing::warn!(guild = %guild_id, "Finding guild: no configuration stored, ignoring event");
            }
            Err(e) => {
                tracing::error!(guild = %event.guild_id(), "Event aborted: {}", e);
            }
        }
    })
}

/// Wait for an event task, logging a panic instead of losing it
pub async fn wait_for_event(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        tracing::error!("Event task failed: {}", e);
    }
}
