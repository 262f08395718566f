use crate::commands::{CommandHandler, CommandResponse};
use crate::config::VoiceConfig;
use crate::gateway::GatewayEvent;
use crate::lifecycle::{DisconnectCause, LifecycleEventHandler};
use crate::recording::{RecordingController, TranscriptionEngine};
use crate::session::SessionRegistry;
use crate::voice::{UserId, VoiceTransport};
use std::sync::Arc;
use tracing::{info, warn};

/// Wires the session core together and routes gateway events into it
pub struct Bot {
    registry: Arc<SessionRegistry>,
    recording: Arc<RecordingController>,
    lifecycle: Arc<LifecycleEventHandler>,
    commands: CommandHandler,
}

impl Bot {
    pub fn new(
        transport: Arc<dyn VoiceTransport>,
        engine: Arc<dyn TranscriptionEngine>,
        voice: &VoiceConfig,
    ) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let recording = Arc::new(RecordingController::new(Arc::clone(&registry), engine));
        let lifecycle = Arc::new(LifecycleEventHandler::new(
            Arc::clone(&registry),
            Arc::clone(&recording),
        ));
        let commands = CommandHandler::new(
            Arc::clone(&registry),
            transport,
            Arc::clone(&recording),
            Arc::clone(&lifecycle),
            voice.self_mute,
        );

        Self {
            registry,
            recording,
            lifecycle,
            commands,
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn recording(&self) -> &RecordingController {
        &self.recording
    }

    pub fn lifecycle(&self) -> &LifecycleEventHandler {
        &self.lifecycle
    }

    pub fn commands(&self) -> &CommandHandler {
        &self.commands
    }

    /// Record the bot's own user id and open the command gate
    pub fn handle_ready(&self, user_id: UserId) {
        self.lifecycle.set_bot_user(user_id);
        self.commands.mark_ready();
        info!(user_id = %user_id, "Gateway ready");
    }

    /// Handle one gateway event; commands produce a response
    pub async fn handle_event(&self, event: GatewayEvent) -> Option<CommandResponse> {
        match event {
            GatewayEvent::Ready { user_id } => {
                self.handle_ready(user_id);
                None
            }
            GatewayEvent::VoiceStateUpdate(update) => {
                self.lifecycle.handle_voice_state_update(&update).await;
                None
            }
            GatewayEvent::Command(invocation) => Some(
                self.commands
                    .dispatch(invocation.command, &invocation.context)
                    .await,
            ),
        }
    }

    /// End every active session
    pub async fn shutdown(&self) {
        let guilds = self.registry.guild_ids();
        info!("Shutting down {} voice session(s)", guilds.len());

        for guild_id in guilds {
            if let Err(e) = self
                .lifecycle
                .force_stop(guild_id, DisconnectCause::Shutdown)
                .await
            {
                warn!(guild_id = %guild_id, "Shutdown cleanup: {}", e);
            }
        }
    }
}
