use super::transcription::TranscriptionEngine;
use crate::error::{VoiceError, VoiceResult};
use crate::session::{SessionRegistry, VoiceSession};
use crate::voice::{GuildId, SinkDescriptor};
use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Starts and stops audio capture on a guild's session
pub struct RecordingController {
    registry: Arc<SessionRegistry>,
    engine: Arc<dyn TranscriptionEngine>,
}

impl RecordingController {
    pub fn new(registry: Arc<SessionRegistry>, engine: Arc<dyn TranscriptionEngine>) -> Self {
        Self { registry, engine }
    }

    /// `idle -> recording`
    ///
    /// Opens a sink on the guild's voice connection, stores it on the session
    /// and hands it to the transcription engine.
    pub async fn start(&self, guild_id: GuildId) -> VoiceResult<SinkDescriptor> {
        let mut guard = self.registry.lock(guild_id).await;
        let session = guard.session_mut().ok_or(VoiceError::NotConnected)?;

        if !session.is_connected() {
            return Err(VoiceError::NotConnected);
        }
        if session.is_recording() {
            warn!(guild_id = %guild_id, "Recording already started");
            return Err(VoiceError::AlreadyRecording);
        }

        let handle = session.voice_handle_mut().ok_or(VoiceError::NotConnected)?;
        let sink = handle
            .open_sink()
            .await
            .context("Failed to open audio sink")
            .map_err(VoiceError::Transport)?;

        let descriptor = sink.descriptor().clone();
        session.set_sink(Some(sink))?;

        self.engine.on_sink_opened(guild_id, &descriptor).await;

        info!(
            guild_id = %guild_id,
            sink_id = %descriptor.sink_id,
            "Recording started"
        );

        Ok(descriptor)
    }

    /// `recording -> idle`
    ///
    /// Fails with `NotRecording` without touching state when the guild has no
    /// session or is idle.
    pub async fn stop(&self, guild_id: GuildId) -> VoiceResult<()> {
        let mut guard = self.registry.lock(guild_id).await;
        let session = match guard.session_mut() {
            Some(session) if session.is_recording() => session,
            _ => return Err(VoiceError::NotRecording),
        };

        self.release_sink(session)
            .await
            .map_err(VoiceError::Transport)?;

        info!(guild_id = %guild_id, "Recording stopped");
        Ok(())
    }

    /// End recording on a session the caller already holds locked
    ///
    /// The session is idle when this returns, whatever the outcome; an error
    /// only reports that closing the sink failed. Returns `false` when there
    /// was nothing to release.
    pub(crate) async fn release_sink(&self, session: &mut VoiceSession) -> anyhow::Result<bool> {
        let guild_id = session.guild_id();

        // Detaching the sink is what makes finalization happen once per recording
        let Some(mut sink) = session.set_sink(None)? else {
            return Ok(false);
        };

        self.engine.on_sink_closed(guild_id).await;

        if let Err(e) = sink.close().await {
            error!(
                guild_id = %guild_id,
                sink_id = %sink.descriptor().sink_id,
                "Failed to close sink: {:#}",
                e
            );
            return Err(e.context("Failed to close audio sink"));
        }

        Ok(true)
    }
}
