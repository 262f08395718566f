//! Platform event feed
//!
//! The gateway sidecar owns the platform connection and forwards its events
//! as JSON over NATS (`<prefix>.gateway.events`).

mod dispatcher;
mod events;
mod nats;

pub use dispatcher::EventDispatcher;
pub use events::{CommandInvocation, GatewayEvent, VoiceStateUpdate};
pub use self::nats::run_nats_gateway;
