/// Parsed view of one command message. Built per event, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub raw: String,
    pub command: String,
    pub args: Vec<String>,
    pub message_id: String,
    pub guild_id: String,
    pub channel_id: String,
    pub user_id: String,
}

impl CommandInvocation {
    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}
