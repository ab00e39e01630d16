use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::services::{CommandContext, CommandHandler, CommandOutput};
use crate::domain::entities::Reply;

pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "List available commands"
    }

    fn usage(&self) -> &'static str {
        "help [command]"
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<CommandOutput, BotError> {
        let prefix = &ctx.config.prefix;

        if let Some(name) = ctx.invocation.arg(0) {
            let reply = match ctx.registry.find(&name.to_lowercase()) {
                Some(cmd) => Reply::success(format!(
                    "`{}{}` - {}",
                    prefix,
                    cmd.usage(),
                    cmd.description()
                )),
                None => Reply::failure(format!("Command `{}{}` not found", prefix, name)),
            };
            return Ok(CommandOutput::reply(reply));
        }

        let mut help = "Available commands:\n".to_string();
        for cmd in ctx.registry.all() {
            help.push_str(&format!("`{}{}` - {}\n", prefix, cmd.usage(), cmd.description()));
        }
        Ok(CommandOutput::reply(Reply::success(help.trim_end())))
    }
}
