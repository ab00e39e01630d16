//! Domain traits - Abstractions for infrastructure implementations

pub mod gateway;
pub mod permission;
pub mod store;

pub use gateway::{BotInfo, Gateway};
pub use permission::PermissionOracle;
pub use store::GuildStore;
