pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod nats;
pub mod recording;
pub mod session;
pub mod voice;

pub use bot::Bot;
pub use commands::{Command, CommandContext, CommandHandler, CommandResponse};
pub use config::Config;
pub use error::{VoiceError, VoiceResult};
pub use gateway::{EventDispatcher, GatewayEvent, VoiceStateUpdate};
pub use http::{create_router, AppState};
pub use lifecycle::{DisconnectCause, LifecycleEventHandler, TeardownReport};
pub use nats::NatsClient;
pub use recording::{NatsTranscriptionNotifier, RecordingController, TranscriptionEngine};
pub use session::{SessionGuard, SessionRegistry, SessionSnapshot, VoiceSession};
pub use voice::{
    ChannelId, ChannelRef, GuildId, NatsVoiceTransport, Sink, SinkDescriptor, UserId,
    VoiceHandle, VoiceTransport,
};
