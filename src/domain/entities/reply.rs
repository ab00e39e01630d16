/// Embed color for successful outcomes
pub const SUCCESS_COLOR: u32 = 0x11ff00;
/// Embed color for rejections
pub const FAILURE_COLOR: u32 = 0xff0000;

/// Outbound formatted reply (rendered as an embed on Discord)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub description: String,
    pub color: u32,
}

impl Reply {
    pub fn new(description: impl Into<String>, color: u32) -> Self {
        Self {
            description: description.into(),
            color,
        }
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self::new(description, SUCCESS_COLOR)
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self::new(description, FAILURE_COLOR)
    }

    pub fn is_failure(&self) -> bool {
        self.color == FAILURE_COLOR
    }
}
