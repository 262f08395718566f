use super::responses::{help_text, Command, CommandContext, CommandResponse};
use crate::error::{VoiceError, VoiceResult};
use crate::lifecycle::{DisconnectCause, LifecycleEventHandler};
use crate::recording::RecordingController;
use crate::session::SessionRegistry;
use crate::voice::VoiceTransport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Handlers behind the slash commands
pub struct CommandHandler {
    registry: Arc<SessionRegistry>,
    transport: Arc<dyn VoiceTransport>,
    recording: Arc<RecordingController>,
    lifecycle: Arc<LifecycleEventHandler>,

    /// Set once the gateway reports ready
    ready: AtomicBool,

    /// Mute the bot right after it joins a channel
    self_mute: bool,
}

impl CommandHandler {
    pub fn new(
        registry: Arc<SessionRegistry>,
        transport: Arc<dyn VoiceTransport>,
        recording: Arc<RecordingController>,
        lifecycle: Arc<LifecycleEventHandler>,
        self_mute: bool,
    ) -> Self {
        Self {
            registry,
            transport,
            recording,
            lifecycle,
            ready: AtomicBool::new(false),
            self_mute,
        }
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Run a command and turn the outcome into a reply
    pub async fn dispatch(&self, command: Command, ctx: &CommandContext) -> CommandResponse {
        let result = match command {
            Command::Connect => self
                .connect(ctx)
                .await
                .map(|name| format!("Connected to {}.", name)),
            Command::Transcribe => self
                .transcribe(ctx)
                .await
                .map(|()| "Starting to transcribe.".to_string()),
            Command::Stop => self
                .stop(ctx)
                .await
                .map(|()| "Stopped transcribing.".to_string()),
            Command::Disconnect => self
                .disconnect(ctx)
                .await
                .map(|()| "Disconnected from VC.".to_string()),
            Command::Help => Ok(help_text()),
        };

        match result {
            Ok(content) => CommandResponse::ephemeral(content),
            Err(e) => {
                info!(
                    guild_id = %ctx.guild_id,
                    command = command.name(),
                    "Command refused: {}",
                    e
                );
                CommandResponse::ephemeral(e.user_message())
            }
        }
    }

    /// Join the caller's voice channel; returns the channel name
    pub async fn connect(&self, ctx: &CommandContext) -> VoiceResult<String> {
        if !self.is_ready() {
            return Err(VoiceError::NotReady);
        }
        let channel = ctx
            .voice_channel
            .clone()
            .ok_or(VoiceError::NotInVoiceChannel)?;

        let mut guard = self.registry.lock(ctx.guild_id).await;
        if guard.session().is_some_and(|s| s.is_connected()) {
            return Err(VoiceError::AlreadyConnected);
        }

        let mut handle = self
            .transport
            .connect(&channel)
            .await
            .map_err(VoiceError::ConnectFailed)?;

        if self.self_mute {
            if let Err(e) = handle.set_self_mute(true).await {
                warn!(guild_id = %ctx.guild_id, "Failed to self-mute: {:#}", e);
            }
        }

        guard.get_or_create().set_voice_handle(Some(handle));

        info!(
            guild_id = %ctx.guild_id,
            channel_id = %channel.channel_id,
            "Connected to {}",
            channel.name
        );

        Ok(channel.name)
    }

    pub async fn transcribe(&self, ctx: &CommandContext) -> VoiceResult<()> {
        self.recording.start(ctx.guild_id).await.map(|_| ())
    }

    pub async fn stop(&self, ctx: &CommandContext) -> VoiceResult<()> {
        match self.registry.get(ctx.guild_id) {
            Some(snapshot) if snapshot.is_connected => self.recording.stop(ctx.guild_id).await,
            _ => Err(VoiceError::NotConnected),
        }
    }

    pub async fn disconnect(&self, ctx: &CommandContext) -> VoiceResult<()> {
        self.lifecycle
            .force_stop(ctx.guild_id, DisconnectCause::Command)
            .await
            .map(|_| ())
    }
}
