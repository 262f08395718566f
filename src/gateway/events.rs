use crate::commands::{Command, CommandContext};
use crate::voice::{ChannelId, GuildId, UserId};
use serde::{Deserialize, Serialize};

/// Events delivered by the platform gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// The gateway session is up; carries the bot's own user id
    Ready { user_id: UserId },

    /// A member joined, moved or left a voice channel
    VoiceStateUpdate(VoiceStateUpdate),

    /// A user invoked a slash command
    Command(CommandInvocation),
}

impl GatewayEvent {
    /// Guild the event belongs to; `Ready` is gateway-wide
    pub fn guild_id(&self) -> Option<GuildId> {
        match self {
            GatewayEvent::Ready { .. } => None,
            GatewayEvent::VoiceStateUpdate(update) => Some(update.guild_id),
            GatewayEvent::Command(invocation) => Some(invocation.context.guild_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceStateUpdate {
    pub guild_id: GuildId,
    pub user_id: UserId,
    #[serde(default)]
    pub before_channel: Option<ChannelId>,
    /// `None` means the member is no longer in any voice channel
    #[serde(default)]
    pub after_channel: Option<ChannelId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInvocation {
    pub command: Command,
    pub context: CommandContext,
}
