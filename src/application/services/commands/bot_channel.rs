use std::sync::Arc;
use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::services::{CommandContext, CommandHandler, CommandOutput, GuildConfigService};
use crate::domain::entities::{Capability, CommandInvocation, Reply};

/// `setbotchannel [channel ids...]` replaces the channels the bot listens in
pub struct SetBotChannelCommand {
    config: Arc<GuildConfigService>,
}

impl SetBotChannelCommand {
    pub fn new(config: Arc<GuildConfigService>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CommandHandler for SetBotChannelCommand {
    fn name(&self) -> &'static str {
        "setbotchannel"
    }

    fn description(&self) -> &'static str {
        "Restrict bot commands to this channel or the listed channels"
    }

    fn usage(&self) -> &'static str {
        "setbotchannel [channel id...]"
    }

    fn required_capability(&self, _invocation: &CommandInvocation) -> Option<Capability> {
        Some(Capability::Administrator)
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<CommandOutput, BotError> {
        let inv = ctx.invocation;
        let result = self
            .config
            .set_bot_channels(ctx.grant()?, &inv.channel_id, &inv.args)
            .await;

        let config = match result {
            Ok(config) => config,
            Err(BotError::Command(e)) => return Ok(CommandOutput::rejected(&e)),
            Err(e) => return Err(e),
        };

        let description = if inv.has_args() {
            format!(
                "Updated successfully the channel IDs: \n`{}` \nnow take bot commands.",
                config.bot_channels.join(",")
            )
        } else {
            format!(
                "Updated successfully this channel is set to take bot commands; channel ID: `{}`",
                config.bot_channels.first().map(String::as_str).unwrap_or_default()
            )
        };
        Ok(CommandOutput::reply(Reply::success(description)))
    }
}
