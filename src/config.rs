use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub nats: NatsConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct NatsConfig {
    pub url: String,
    /// Prepended to every subject, e.g. `volo` -> `volo.voice.connect`
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// Mute the bot after it joins a channel
    #[serde(default = "default_self_mute")]
    pub self_mute: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            self_mute: default_self_mute(),
        }
    }
}

fn default_subject_prefix() -> String {
    "volo".to_string()
}

fn default_self_mute() -> bool {
    true
}

impl Config {
    /// Load `path` (extension optional) overlaid with `VOLO`-prefixed environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("VOLO").separator("__"))
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        Ok(settings.try_deserialize()?)
    }
}
