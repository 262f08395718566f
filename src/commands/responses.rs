use crate::voice::{ChannelRef, GuildId, UserId};
use serde::{Deserialize, Serialize};

/// Slash commands the bot answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Connect,
    Transcribe,
    Stop,
    Disconnect,
    Help,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Connect,
        Command::Disconnect,
        Command::Transcribe,
        Command::Stop,
        Command::Help,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Connect => "connect",
            Command::Transcribe => "transcribe",
            Command::Stop => "stop",
            Command::Disconnect => "disconnect",
            Command::Help => "help",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Connect => "Connect to your voice channel.",
            Command::Transcribe => "Transcribe the voice channel.",
            Command::Stop => "Stop the transcription.",
            Command::Disconnect => "Disconnect from your voice channel.",
            Command::Help => "Show the help message.",
        }
    }
}

/// Who invoked a command, and from where
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandContext {
    pub guild_id: GuildId,
    pub user_id: UserId,

    /// Voice channel the invoking user is in, if any
    #[serde(default)]
    pub voice_channel: Option<ChannelRef>,
}

/// Reply to a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub content: String,

    /// Visible only to the invoking user
    pub ephemeral: bool,
}

impl CommandResponse {
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

pub(crate) fn help_text() -> String {
    let mut text = String::from(
        "**Volo Help**\nVolo is a bot that can record your voice channel and transcribe it.\n",
    );
    for command in Command::ALL {
        text.push_str(&format!("\n`/{}`: {}", command.name(), command.description()));
    }
    text
}
