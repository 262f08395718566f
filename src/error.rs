//! Error taxonomy for voice session transitions
//!
//! Every variant is recoverable: command handlers turn it into a user-facing
//! reply and the process keeps running.

/// Errors produced by session, recording and command operations
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// No session, or the session has no live voice handle
    #[error("not connected to a voice channel")]
    NotConnected,

    /// `start` on a session that already owns a sink
    #[error("already recording")]
    AlreadyRecording,

    /// `stop` on an idle (or absent) session
    #[error("not recording")]
    NotRecording,

    /// The voice transport refused or failed the connection
    #[error("failed to connect: {0:#}")]
    ConnectFailed(anyhow::Error),

    /// No session exists for the guild
    #[error("no voice session for this guild")]
    NoSession,

    /// `connect` in a guild whose session already holds a voice handle
    #[error("already connected to a voice channel")]
    AlreadyConnected,

    /// Commands arrived before the gateway reported ready
    #[error("bot is not ready")]
    NotReady,

    /// The invoking user is not in a voice channel
    #[error("caller is not in a voice channel")]
    NotInVoiceChannel,

    /// A collaborator failed after the session state was already settled
    #[error("voice transport error: {0:#}")]
    Transport(anyhow::Error),
}

impl VoiceError {
    /// Reply shown to the user who issued the command
    pub fn user_message(&self) -> String {
        match self {
            VoiceError::NotConnected | VoiceError::NoSession => {
                "I am not in your voice channel.".to_string()
            }
            VoiceError::AlreadyRecording => "I am already transcribing.".to_string(),
            VoiceError::NotRecording => "I am not transcribing.".to_string(),
            VoiceError::ConnectFailed(e) => format!("{:#}", e),
            VoiceError::AlreadyConnected => {
                "I am already connected to a voice channel.".to_string()
            }
            VoiceError::NotReady => "I am not ready yet. Try again later.".to_string(),
            VoiceError::NotInVoiceChannel => "You are not in a voice channel.".to_string(),
            VoiceError::Transport(e) => format!("Something went wrong: {:#}", e),
        }
    }
}

/// Result type for voice session operations
pub type VoiceResult<T> = Result<T, VoiceError>;
