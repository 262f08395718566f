use super::snapshot::SessionSnapshot;
use crate::error::{VoiceError, VoiceResult};
use crate::voice::{GuildId, Sink, VoiceHandle};
use chrono::{DateTime, Utc};
use tracing::warn;

/// One guild's voice connection and recording sink
///
/// Pure state holder: no network calls originate here. Releasing a handle or
/// sink that is swapped out is the caller's job; the previous value is handed
/// back for that purpose.
pub struct VoiceSession {
    guild_id: GuildId,

    /// Live connection to the voice transport
    voice_handle: Option<Box<dyn VoiceHandle>>,

    /// Audio capture handle, present only while recording
    sink: Option<Box<dyn Sink>>,

    /// Mirrors `sink.is_some()`; updated in the same call
    is_recording: bool,

    connected_at: Option<DateTime<Utc>>,
    recording_since: Option<DateTime<Utc>>,
}

impl VoiceSession {
    /// Create an empty session (no handle, no sink)
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            voice_handle: None,
            sink: None,
            is_recording: false,
            connected_at: None,
            recording_since: None,
        }
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn is_connected(&self) -> bool {
        self.voice_handle.is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    /// Neither connected nor recording; such a session must not stay registered
    pub fn is_vacant(&self) -> bool {
        self.voice_handle.is_none() && self.sink.is_none()
    }

    pub fn voice_handle_mut(&mut self) -> Option<&mut (dyn VoiceHandle + 'static)> {
        self.voice_handle.as_deref_mut()
    }

    pub fn sink(&self) -> Option<&(dyn Sink + 'static)> {
        self.sink.as_deref()
    }

    /// Replace the owned connection, returning the previous one
    ///
    /// Clearing the handle while a sink is still attached drops the sink
    /// without closing it; callers release the sink first.
    pub fn set_voice_handle(
        &mut self,
        handle: Option<Box<dyn VoiceHandle>>,
    ) -> Option<Box<dyn VoiceHandle>> {
        if handle.is_none() && self.sink.is_some() {
            warn!(
                guild_id = %self.guild_id,
                "Voice handle cleared with an open sink; dropping sink unreleased"
            );
            self.sink = None;
            self.is_recording = false;
            self.recording_since = None;
        }

        self.connected_at = handle.as_ref().map(|_| Utc::now());
        std::mem::replace(&mut self.voice_handle, handle)
    }

    /// Replace the owned capture handle, returning the previous one
    ///
    /// The recording flag follows the sink. Attaching a sink requires a live
    /// voice handle.
    pub fn set_sink(&mut self, sink: Option<Box<dyn Sink>>) -> VoiceResult<Option<Box<dyn Sink>>> {
        if sink.is_some() && self.voice_handle.is_none() {
            return Err(VoiceError::NotConnected);
        }

        self.is_recording = sink.is_some();
        self.recording_since = sink.as_ref().map(|_| Utc::now());
        Ok(std::mem::replace(&mut self.sink, sink))
    }

    /// `is_recording ⇒ sink ⇒ voice_handle`
    pub fn invariant_holds(&self) -> bool {
        (!self.is_recording || self.sink.is_some())
            && (self.sink.is_none() || self.voice_handle.is_some())
            && (self.is_recording == self.sink.is_some())
    }

    /// Point-in-time view of this session
    pub fn snapshot(&self) -> SessionSnapshot {
        let channel = self.voice_handle.as_ref().map(|h| h.channel().clone());
        SessionSnapshot {
            guild_id: self.guild_id,
            channel_id: channel.as_ref().map(|c| c.channel_id),
            channel_name: channel.map(|c| c.name),
            is_connected: self.is_connected(),
            is_recording: self.is_recording,
            sink_id: self.sink.as_ref().map(|s| s.descriptor().sink_id.clone()),
            connected_at: self.connected_at,
            recording_since: self.recording_since,
        }
    }
}

impl std::fmt::Debug for VoiceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSession")
            .field("guild_id", &self.guild_id)
            .field("connected", &self.is_connected())
            .field("recording", &self.is_recording)
            .finish()
    }
}
