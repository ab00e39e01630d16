//! Invocation parser - Turns prefixed messages into command invocations

use crate::domain::entities::{CommandInvocation, MessageEvent};

/// Tokenizes message content into a command keyword and its arguments
#[derive(Debug, Default, Clone, Copy)]
pub struct InvocationParser;

impl InvocationParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a message against the guild's prefix.
    ///
    /// Returns `None` when the content does not start with the prefix or
    /// carries no keyword after it. The keyword is lowercased; arguments are
    /// kept as typed.
    pub fn parse(&self, prefix: &str, message: &MessageEvent) -> Option<CommandInvocation> {
        let rest = message.content.strip_prefix(prefix)?;

        // "! ping" is not a command
        if rest.starts_with(char::is_whitespace) {
            return None;
        }

        let mut parts = rest.split_whitespace();
        let command = parts.next()?.to_lowercase();
        let args = parts.map(str::to_string).collect();

        Some(CommandInvocation {
            raw: message.content.clone(),
            command,
            args,
            message_id: message.id.clone(),
            guild_id: message.guild_id.clone(),
            channel_id: message.channel_id.clone(),
            user_id: message.author_id.clone(),
        })
    }
}
