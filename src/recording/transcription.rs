use crate::nats::{subjects, NatsClient, SinkClosedMessage, SinkOpenedMessage};
use crate::voice::{GuildId, SinkDescriptor};
use chrono::Utc;
use tracing::{error, info};

/// Transcription engine notifications
///
/// Fire-and-forget: the core never waits on transcription progress, and
/// implementations log their own failures instead of returning them.
#[async_trait::async_trait]
pub trait TranscriptionEngine: Send + Sync {
    /// A sink started capturing audio for the guild
    async fn on_sink_opened(&self, guild_id: GuildId, sink: &SinkDescriptor);

    /// The guild's sink was closed; finalize whatever was transcribed
    async fn on_sink_closed(&self, guild_id: GuildId);
}

/// Publishes sink lifecycle notifications for the transcription service over NATS
pub struct NatsTranscriptionNotifier {
    nats: NatsClient,
}

impl NatsTranscriptionNotifier {
    pub fn new(nats: NatsClient) -> Self {
        Self { nats }
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for NatsTranscriptionNotifier {
    async fn on_sink_opened(&self, guild_id: GuildId, sink: &SinkDescriptor) {
        let message = SinkOpenedMessage {
            guild_id,
            sink_id: sink.sink_id.clone(),
            audio_subject: sink.audio_subject.clone(),
            timestamp: Utc::now().to_rfc3339(),
        };

        match self
            .nats
            .publish_json(subjects::TRANSCRIPTION_SINK_OPENED, &message)
            .await
        {
            Ok(()) => info!(guild_id = %guild_id, sink_id = %sink.sink_id, "Transcription started"),
            Err(e) => error!(guild_id = %guild_id, "Failed to notify transcription engine: {:#}", e),
        }
    }

    async fn on_sink_closed(&self, guild_id: GuildId) {
        let message = SinkClosedMessage {
            guild_id,
            timestamp: Utc::now().to_rfc3339(),
        };

        match self
            .nats
            .publish_json(subjects::TRANSCRIPTION_SINK_CLOSED, &message)
            .await
        {
            Ok(()) => info!(guild_id = %guild_id, "Transcription finalizing"),
            Err(e) => error!(guild_id = %guild_id, "Failed to notify transcription engine: {:#}", e),
        }
    }
}
