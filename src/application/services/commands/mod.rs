//! Built-in text commands

mod bot_channel;
mod help;
mod ping;
mod prefix;

use std::sync::Arc;

pub use bot_channel::SetBotChannelCommand;
pub use help::HelpCommand;
pub use ping::{PingCommand, PING_REACTION};
pub use prefix::PrefixCommand;

use super::{CommandRegistry, GuildConfigService};

/// Registry holding every built-in command
pub fn default_registry(config: Arc<GuildConfigService>) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(PingCommand));
    registry.register(Arc::new(PrefixCommand::new(config.clone())));
    registry.register(Arc::new(SetBotChannelCommand::new(config)));
    registry.register(Arc::new(HelpCommand));
    registry
}
