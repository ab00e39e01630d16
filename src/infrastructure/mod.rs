//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Database: SQLite guild store
//! - Storage: In-memory guild store
//! - Adapters: Platform integrations (Discord, console)

pub mod config;
pub mod database;
pub mod storage;
pub mod adapters;
