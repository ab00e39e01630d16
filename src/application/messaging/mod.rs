//! Message handling - Event-driven command dispatch

pub mod authorization;
pub mod dispatcher;
pub mod parser;

pub use authorization::{AdminGrant, AuthorizationGate};
pub use dispatcher::{spawn_event, wait_for_event, Dispatcher};
pub use parser::InvocationParser;
