//! Voice transport backed by the gateway sidecar over NATS request/reply

use super::transport::{Sink, VoiceHandle, VoiceTransport};
use super::types::{ChannelRef, GuildId, SinkDescriptor};
use crate::nats::messages::{ConnectRequest, ConnectionRequest, SinkCloseRequest};
use crate::nats::{subjects, NatsClient, TransportReply};
use anyhow::{anyhow, Context, Result};
use tracing::info;

pub struct NatsVoiceTransport {
    nats: NatsClient,
}

impl NatsVoiceTransport {
    pub fn new(nats: NatsClient) -> Self {
        Self { nats }
    }
}

#[async_trait::async_trait]
impl VoiceTransport for NatsVoiceTransport {
    async fn connect(&self, channel: &ChannelRef) -> Result<Box<dyn VoiceHandle>> {
        let request = ConnectRequest {
            guild_id: channel.guild_id,
            channel_id: channel.channel_id,
        };

        let reply: TransportReply = self
            .nats
            .request_json(subjects::VOICE_CONNECT, &request)
            .await?;
        let reply = reply.into_result()?;

        let connection_id = reply
            .connection_id
            .ok_or_else(|| anyhow!("voice connect reply is missing a connection id"))?;

        info!(
            guild_id = %channel.guild_id,
            connection_id = %connection_id,
            "Joined voice channel {}",
            channel.name
        );

        Ok(Box::new(NatsVoiceHandle {
            nats: self.nats.clone(),
            channel: channel.clone(),
            connection_id,
        }))
    }
}

pub struct NatsVoiceHandle {
    nats: NatsClient,
    channel: ChannelRef,
    connection_id: String,
}

impl NatsVoiceHandle {
    fn request(&self, self_mute: Option<bool>) -> ConnectionRequest {
        ConnectionRequest {
            guild_id: self.channel.guild_id,
            connection_id: self.connection_id.clone(),
            self_mute,
        }
    }
}

#[async_trait::async_trait]
impl VoiceHandle for NatsVoiceHandle {
    fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    async fn open_sink(&mut self) -> Result<Box<dyn Sink>> {
        let reply: TransportReply = self
            .nats
            .request_json(subjects::SINK_OPEN, &self.request(None))
            .await?;
        let descriptor = reply
            .into_result()?
            .sink
            .ok_or_else(|| anyhow!("sink open reply is missing the sink descriptor"))?;

        Ok(Box::new(NatsSink {
            nats: self.nats.clone(),
            guild_id: self.channel.guild_id,
            descriptor,
        }))
    }

    async fn set_self_mute(&mut self, muted: bool) -> Result<()> {
        let reply: TransportReply = self
            .nats
            .request_json(subjects::VOICE_STATE, &self.request(Some(muted)))
            .await?;
        reply.into_result().context("Failed to change voice state")?;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        let reply: TransportReply = self
            .nats
            .request_json(subjects::VOICE_DISCONNECT, &self.request(None))
            .await?;
        reply.into_result().context("Failed to leave voice channel")?;
        Ok(())
    }
}

pub struct NatsSink {
    nats: NatsClient,
    guild_id: GuildId,
    descriptor: SinkDescriptor,
}

#[async_trait::async_trait]
impl Sink for NatsSink {
    fn descriptor(&self) -> &SinkDescriptor {
        &self.descriptor
    }

    async fn close(&mut self) -> Result<()> {
        let request = SinkCloseRequest {
            guild_id: self.guild_id,
            sink_id: self.descriptor.sink_id.clone(),
        };
        let reply: TransportReply = self
            .nats
            .request_json(subjects::SINK_CLOSE, &request)
            .await?;
        reply.into_result().context("Failed to close sink")?;
        Ok(())
    }
}
