use super::events::GatewayEvent;
use crate::bot::Bot;
use crate::commands::CommandResponse;
use crate::voice::GuildId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

type Job = (GatewayEvent, oneshot::Sender<Option<CommandResponse>>);

/// Routes gateway events to one worker task per guild
///
/// Events for a guild are handled one after another in arrival order, so a
/// forced leave followed by `/connect` never runs the other way round.
/// Different guilds have their own workers and proceed concurrently.
pub struct EventDispatcher {
    bot: Arc<Bot>,
    workers: StdMutex<HashMap<GuildId, mpsc::UnboundedSender<Job>>>,
}

impl EventDispatcher {
    pub fn new(bot: Arc<Bot>) -> Self {
        Self {
            bot,
            workers: StdMutex::new(HashMap::new()),
        }
    }

    /// Queue an event; the receiver resolves with the command response, if any
    ///
    /// Must be called from within a tokio runtime. `Ready` is applied before
    /// this returns so that every later event sees the gate open.
    pub fn dispatch(&self, event: GatewayEvent) -> oneshot::Receiver<Option<CommandResponse>> {
        let (respond, response) = oneshot::channel();

        let Some(guild_id) = event.guild_id() else {
            if let GatewayEvent::Ready { user_id } = event {
                self.bot.handle_ready(user_id);
            }
            let _ = respond.send(None);
            return response;
        };

        let mut workers = self
            .workers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut job = (event, respond);
        loop {
            let worker = workers
                .entry(guild_id)
                .or_insert_with(|| spawn_worker(Arc::clone(&self.bot), guild_id));
            match worker.send(job) {
                Ok(()) => break,
                Err(mpsc::error::SendError(returned)) => {
                    // Worker task is gone (a handler panicked); start a fresh one
                    debug!(guild_id = %guild_id, "Restarting gateway worker");
                    workers.remove(&guild_id);
                    job = returned;
                }
            }
        }

        response
    }
}

fn spawn_worker(bot: Arc<Bot>, guild_id: GuildId) -> mpsc::UnboundedSender<Job> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

    tokio::spawn(async move {
        debug!(guild_id = %guild_id, "Gateway worker started");
        while let Some((event, respond)) = rx.recv().await {
            let response = bot.handle_event(event).await;
            // The caller may have stopped waiting
            let _ = respond.send(response);
        }
    });

    tx
}
