//! Domain entities - Core business objects with no external dependencies

pub mod guild;
pub mod event;
pub mod invocation;
pub mod reply;
pub mod capability;

pub use guild::{GuildConfiguration, GuildInfo};
pub use event::{GatewayEvent, MessageEvent};
pub use invocation::CommandInvocation;
pub use reply::{Reply, FAILURE_COLOR, SUCCESS_COLOR};
pub use capability::Capability;
