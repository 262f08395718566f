//! Session teardown
//!
//! `force_stop` is the one cleanup path: the `/disconnect` command, platform
//! voice-state events and process shutdown all end a session through it.

use crate::error::{VoiceError, VoiceResult};
use crate::gateway::VoiceStateUpdate;
use crate::recording::RecordingController;
use crate::session::SessionRegistry;
use crate::voice::{ChannelRef, GuildId, UserId};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Who asked for the session to end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectCause {
    /// A user issued `/disconnect`
    Command,
    /// The platform removed the bot from the channel
    Forced,
    /// The process is shutting down
    Shutdown,
}

/// Outcome of a completed teardown
#[derive(Debug, Clone)]
pub struct TeardownReport {
    pub guild_id: GuildId,
    pub channel: Option<ChannelRef>,
    pub was_recording: bool,
}

pub struct LifecycleEventHandler {
    registry: Arc<SessionRegistry>,
    recording: Arc<RecordingController>,
    bot_user: OnceLock<UserId>,
}

impl LifecycleEventHandler {
    pub fn new(registry: Arc<SessionRegistry>, recording: Arc<RecordingController>) -> Self {
        Self {
            registry,
            recording,
            bot_user: OnceLock::new(),
        }
    }

    /// Record the bot's own user id, reported by the gateway when ready
    pub fn set_bot_user(&self, user_id: UserId) {
        if let Err(ignored) = self.bot_user.set(user_id) {
            if self.bot_user.get() != Some(&ignored) {
                warn!("Bot user id changed to {}; keeping {:?}", ignored, self.bot_user.get());
            }
        }
    }

    pub fn bot_user(&self) -> Option<UserId> {
        self.bot_user.get().copied()
    }

    /// React to a voice-state change
    ///
    /// Only the bot's own membership ending (no channel afterwards) triggers
    /// cleanup. Never fails: errors are logged.
    pub async fn handle_voice_state_update(&self, update: &VoiceStateUpdate) {
        let Some(bot_user) = self.bot_user() else {
            debug!("Ignoring voice state update before ready");
            return;
        };
        if update.user_id != bot_user || update.after_channel.is_some() {
            return;
        }

        match self.force_stop(update.guild_id, DisconnectCause::Forced).await {
            Ok(report) => info!(
                guild_id = %report.guild_id,
                was_recording = report.was_recording,
                "Cleaned up after forced disconnect"
            ),
            Err(VoiceError::NoSession) => {
                debug!(guild_id = %update.guild_id, "Bot left voice; no session to clean up")
            }
            Err(e) => warn!(guild_id = %update.guild_id, "Forced disconnect cleanup: {}", e),
        }
    }

    /// Tear down a guild's session
    ///
    /// Stops recording (closing the sink and finalizing transcription) if
    /// needed, clears and disconnects the voice handle, and removes the entry.
    /// The registry ends in the same state for every cause; only `Command`
    /// surfaces a transport error from disconnecting, after cleanup finished.
    pub async fn force_stop(
        &self,
        guild_id: GuildId,
        cause: DisconnectCause,
    ) -> VoiceResult<TeardownReport> {
        // Held until the end so a new connect waits for the old handle to go
        let mut guard = self.registry.lock(guild_id).await;
        let Some(mut session) = guard.take() else {
            return Err(VoiceError::NoSession);
        };

        if !session.is_connected() {
            return Err(VoiceError::NotConnected);
        }

        let was_recording = session.is_recording();
        if was_recording {
            if let Err(e) = self.recording.release_sink(&mut session).await {
                warn!(guild_id = %guild_id, ?cause, "Sink release failed during teardown: {:#}", e);
            }
        }

        let mut transport_error = None;
        let handle = session.set_voice_handle(None);
        let channel = handle.as_ref().map(|h| h.channel().clone());
        if let Some(mut handle) = handle {
            if let Err(e) = handle.disconnect().await {
                warn!(guild_id = %guild_id, ?cause, "Voice disconnect failed: {:#}", e);
                if cause == DisconnectCause::Command {
                    transport_error = Some(e);
                }
            }
        }

        debug_assert!(session.is_vacant());
        drop(guard);

        info!(guild_id = %guild_id, ?cause, was_recording, "Voice session ended");

        match transport_error {
            Some(e) => Err(VoiceError::Transport(e)),
            None => Ok(TeardownReport {
                guild_id,
                channel,
                was_recording,
            }),
        }
    }
}
