use crate::voice::{ChannelId, GuildId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only view of a voice session, safe to hold outside the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub guild_id: GuildId,

    /// Channel the bot is connected to, if any
    pub channel_id: Option<ChannelId>,
    pub channel_name: Option<String>,

    pub is_connected: bool,
    pub is_recording: bool,

    /// Id of the open sink while recording
    pub sink_id: Option<String>,

    pub connected_at: Option<DateTime<Utc>>,
    pub recording_since: Option<DateTime<Utc>>,
}
