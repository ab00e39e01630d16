use std::fmt;

/// Platform-granted permission a command may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Administrator,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
