use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::services::{CommandContext, CommandHandler, CommandOutput};
use crate::domain::entities::Reply;

pub const PING_REACTION: &str = "🏓";

pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn description(&self) -> &'static str {
        "Check that the bot is alive"
    }

    async fn execute(&self, _ctx: &CommandContext<'_>) -> Result<CommandOutput, BotError> {
        Ok(CommandOutput::reply(Reply::success("pong!")).with_reaction(PING_REACTION))
    }
}
