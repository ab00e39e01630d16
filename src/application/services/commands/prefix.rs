use std::sync::Arc;
use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::services::{CommandContext, CommandHandler, CommandOutput, GuildConfigService};
use crate::domain::entities::{Capability, CommandInvocation, Reply};

/// `prefix` shows the current prefix; `prefix <new>` changes it (admin only)
pub struct PrefixCommand {
    config: Arc<GuildConfigService>,
}

impl PrefixCommand {
    pub fn new(config: Arc<GuildConfigService>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CommandHandler for PrefixCommand {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn description(&self) -> &'static str {
        "Show or change the command prefix"
    }

    fn usage(&self) -> &'static str {
        "prefix [new prefix]"
    }

    fn required_capability(&self, invocation: &CommandInvocation) -> Option<Capability> {
        invocation.has_args().then_some(Capability::Administrator)
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<CommandOutput, BotError> {
        let Some(requested) = ctx.invocation.arg(0) else {
            return Ok(CommandOutput::reply(Reply::success(format!(
                "The prefix for this server is `{}`.",
                ctx.config.prefix
            ))));
        };

        match self.config.set_prefix(ctx.grant()?, requested).await {
            Ok(config) => Ok(CommandOutput::reply(Reply::success(format!(
                "Updated successfully prefix now set to `{}`",
                config.prefix
            )))),
            Err(BotError::Command(e)) => Ok(CommandOutput::rejected(&e)),
            Err(e) => Err(e),
        }
    }
}
