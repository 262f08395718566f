use crate::voice::{ChannelId, GuildId, SinkDescriptor};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Subject suffixes, relative to the configured prefix
pub mod subjects {
    pub const GATEWAY_EVENTS: &str = "gateway.events";
    pub const VOICE_CONNECT: &str = "voice.connect";
    pub const VOICE_DISCONNECT: &str = "voice.disconnect";
    pub const VOICE_STATE: &str = "voice.state";
    pub const SINK_OPEN: &str = "voice.sink.open";
    pub const SINK_CLOSE: &str = "voice.sink.close";
    pub const TRANSCRIPTION_SINK_OPENED: &str = "transcription.sink.opened";
    pub const TRANSCRIPTION_SINK_CLOSED: &str = "transcription.sink.closed";
}

/// Ask the gateway sidecar to join a voice channel
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectRequest {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
}

/// Operations on an established connection
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub guild_id: GuildId,
    pub connection_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_mute: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SinkCloseRequest {
    pub guild_id: GuildId,
    pub sink_id: String,
}

/// Reply to every voice transport request
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransportReply {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub sink: Option<SinkDescriptor>,
}

impl TransportReply {
    /// Turn an `ok: false` reply into an error carrying the sidecar's message
    pub fn into_result(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(anyhow!(self
                .error
                .unwrap_or_else(|| "voice transport rejected the request".to_string())))
        }
    }
}

/// Published when a sink starts delivering audio for a guild
#[derive(Debug, Serialize, Deserialize)]
pub struct SinkOpenedMessage {
    pub guild_id: GuildId,
    pub sink_id: String,
    pub audio_subject: String,
    pub timestamp: String, // RFC3339 timestamp
}

/// Published when a guild's sink is closed and its transcript can be finalized
#[derive(Debug, Serialize, Deserialize)]
pub struct SinkClosedMessage {
    pub guild_id: GuildId,
    pub timestamp: String, // RFC3339 timestamp
}
