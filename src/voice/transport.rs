use super::types::{ChannelRef, SinkDescriptor};
use anyhow::Result;

/// Voice transport of the chat platform
///
/// Implementations:
/// - NATS: request/reply against the gateway sidecar (`NatsVoiceTransport`)
/// - In-memory fakes in the integration tests
#[async_trait::async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Join a voice channel
    async fn connect(&self, channel: &ChannelRef) -> Result<Box<dyn VoiceHandle>>;
}

/// A live voice connection, owned by exactly one session
#[async_trait::async_trait]
pub trait VoiceHandle: Send + Sync {
    /// Channel this connection is in
    fn channel(&self) -> &ChannelRef;

    /// Open an audio capture sink on this connection
    async fn open_sink(&mut self) -> Result<Box<dyn Sink>>;

    /// Mute or unmute the bot in the channel
    async fn set_self_mute(&mut self, muted: bool) -> Result<()>;

    /// Leave the channel and release the connection
    async fn disconnect(&mut self) -> Result<()>;
}

/// An open audio capture stream tied to a voice connection
#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    fn descriptor(&self) -> &SinkDescriptor;

    /// Stop capturing and release the stream
    async fn close(&mut self) -> Result<()>;
}
