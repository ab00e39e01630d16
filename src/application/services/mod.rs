//! Application services - Command handlers and configuration mutation

pub mod command_service;
pub mod commands;
pub mod guild_config;

pub use command_service::{CommandContext, CommandHandler, CommandOutput, CommandRegistry};
pub use guild_config::{GuildConfigService, MutationPolicy};
