use super::dispatcher::EventDispatcher;
use super::events::GatewayEvent;
use crate::bot::Bot;
use crate::nats::{subjects, NatsClient};
use anyhow::Result;
use futures::stream::StreamExt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Consume gateway events from NATS until the subscription ends
///
/// Events are handed to the per-guild dispatcher in the order they arrive.
/// Command responses are published on the message's reply subject.
pub async fn run_nats_gateway(bot: Arc<Bot>, nats: NatsClient) -> Result<()> {
    let mut events = nats.subscribe(subjects::GATEWAY_EVENTS).await?;

    let dispatcher = EventDispatcher::new(bot);

    info!("Gateway bridge started");

    while let Some(msg) = events.next().await {
        let event = match serde_json::from_slice::<GatewayEvent>(&msg.payload) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to parse gateway event: {}", e);
                continue;
            }
        };

        let response = dispatcher.dispatch(event);
        let nats = nats.clone();
        tokio::spawn(async move {
            let Ok(Some(response)) = response.await else {
                return;
            };
            let Some(reply) = msg.reply else {
                warn!("Command response has no reply subject; dropping it");
                return;
            };

            let payload = match serde_json::to_vec(&response) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to encode command response: {}", e);
                    return;
                }
            };
            if let Err(e) = nats.inner().publish(reply, payload.into()).await {
                error!("Failed to publish command response: {}", e);
            }
        });
    }

    info!("Gateway bridge stopped");
    Ok(())
}
