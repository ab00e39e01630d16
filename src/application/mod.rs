//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Command handlers and the guild configuration mutator
//! - Errors: Domain-specific errors
//! - Messaging: Invocation parsing, authorization, dispatching

pub mod errors;
pub mod services;
pub mod messaging;
