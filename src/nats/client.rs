use anyhow::{Context, Result};
use async_nats::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

/// Thin JSON layer over a NATS connection, scoped to one subject prefix
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
    prefix: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            prefix: prefix.into(),
        })
    }

    /// Full subject for a suffix, e.g. `voice.connect` -> `volo.voice.connect`
    pub fn subject(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}.{}", self.prefix, suffix)
        }
    }

    /// Publish a JSON message, fire-and-forget
    pub async fn publish_json<T: Serialize>(&self, suffix: &str, message: &T) -> Result<()> {
        let subject = self.subject(suffix);
        let payload = serde_json::to_vec(message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .with_context(|| format!("Failed to publish to {}", subject))?;

        debug!("Published to {}", subject);
        Ok(())
    }

    /// Send a JSON request and decode the JSON reply
    pub async fn request_json<Req, Resp>(&self, suffix: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let subject = self.subject(suffix);
        let payload = serde_json::to_vec(request)?;

        let reply = self
            .client
            .request(subject.clone(), payload.into())
            .await
            .with_context(|| format!("Request to {} failed", subject))?;

        serde_json::from_slice(&reply.payload)
            .with_context(|| format!("Malformed reply from {}", subject))
    }

    /// Subscribe to a subject under the prefix
    pub async fn subscribe(&self, suffix: &str) -> Result<async_nats::Subscriber> {
        let subject = self.subject(suffix);

        info!("Subscribing on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .with_context(|| format!("Failed to subscribe to {}", subject))?;

        Ok(subscriber)
    }

    /// Underlying connection, for replying on inbox subjects
    pub fn inner(&self) -> &Client {
        &self.client
    }
}
