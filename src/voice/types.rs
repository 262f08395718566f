use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

snowflake!(
    /// Guild (server) identifier, the key of every voice session
    GuildId
);
snowflake!(
    /// Voice channel identifier
    ChannelId
);
snowflake!(
    /// Platform user identifier
    UserId
);

/// A voice channel the bot can join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    /// Display name, used in replies
    pub name: String,
}

/// Where an open sink delivers its captured audio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkDescriptor {
    pub sink_id: String,
    /// Subject the transport publishes captured audio frames on
    pub audio_subject: String,
}
