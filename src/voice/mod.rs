//! Voice transport abstractions
//!
//! The platform's voice connection and audio capture are external; the core
//! only sees them through these traits.

pub mod nats;
mod transport;
mod types;

pub use self::nats::NatsVoiceTransport;
pub use transport::{Sink, VoiceHandle, VoiceTransport};
pub use types::{ChannelId, ChannelRef, GuildId, SinkDescriptor, UserId};
