//! guild-bot - prefix-driven command handling for a Discord guild bot
//!
//! Inbound gateway events are resolved against per-guild configuration
//! (prefix, allowed channels), privileged commands pass a single
//! authorization gate, and replies go back out through the gateway.

pub mod domain;
pub mod application;
pub mod infrastructure;
