use std::collections::BTreeMap;
use std::sync::Arc;
use async_trait::async_trait;

use crate::application::errors::{BotError, CommandError};
use crate::application::messaging::AdminGrant;
use crate::domain::entities::{Capability, CommandInvocation, GuildConfiguration, Reply};

/// What a command wants sent back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub reply: Option<Reply>,
    pub reaction: Option<String>,
}

impl CommandOutput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn reply(reply: Reply) -> Self {
        Self {
            reply: Some(reply),
            reaction: None,
        }
    }

    pub fn with_reaction(mut self, emoji: impl Into<String>) -> Self {
        self.reaction = Some(emoji.into());
        self
    }

    /// Failure-colored reply carrying a validation error's message
    pub fn rejected(error: &CommandError) -> Self {
        Self::reply(Reply::failure(error.to_string()))
    }
}

/// Everything a handler sees for one invocation
pub struct CommandContext<'a> {
    pub invocation: &'a CommandInvocation,
    pub config: &'a GuildConfiguration,
    pub grant: Option<&'a AdminGrant>,
    pub registry: &'a CommandRegistry,
}

impl<'a> CommandContext<'a> {
    /// The grant issued by the authorization gate, if the command required one
    pub fn grant(&self) -> Result<&'a AdminGrant, BotError> {
        self.grant
            .ok_or_else(|| BotError::Command(CommandError::PermissionDenied))
    }
}

/// A registered text command
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Keyword matched exactly after the prefix
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Usage without the prefix, e.g. `prefix [new prefix]`
    fn usage(&self) -> &'static str {
        self.name()
    }

    /// Capability the invoking user must hold for this particular invocation
    fn required_capability(&self, _invocation: &CommandInvocation) -> Option<Capability> {
        None
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<CommandOutput, BotError>;
}

/// Command table keyed by keyword
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Arc<dyn CommandHandler>) {
        self.commands.insert(command.name().to_lowercase(), command);
    }

    pub fn find(&self, keyword: &str) -> Option<Arc<dyn CommandHandler>> {
        self.commands.get(keyword).cloned()
    }

    /// Commands in keyword order
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn CommandHandler>> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
