//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Guild configuration, gateway events, invocations, replies
//! - Traits: Abstractions for infrastructure (Gateway, GuildStore, PermissionOracle)

pub mod entities;
pub mod traits;
