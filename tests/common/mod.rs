// In-memory collaborators shared by the integration tests
#![allow(dead_code)]

use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use volo_voice::commands::CommandContext;
use volo_voice::config::VoiceConfig;
use volo_voice::{
    Bot, ChannelId, ChannelRef, GatewayEvent, GuildId, Sink, SinkDescriptor, TranscriptionEngine,
    UserId, VoiceHandle, VoiceTransport,
};

pub const BOT_USER: UserId = UserId(999);
pub const CALLER: UserId = UserId(42);

/// Counters shared by the fake transport and everything it hands out
#[derive(Default)]
pub struct TransportLog {
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub mutes: AtomicUsize,
    pub sinks_opened: AtomicUsize,
    pub sinks_closed: AtomicUsize,
    /// (guild, connection id) per successful connect
    pub connections: Mutex<Vec<(GuildId, usize)>>,
}

impl TransportLog {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeTransport {
    pub log: Arc<TransportLog>,
    pub fail_connect: AtomicBool,
    pub fail_sink_close: Arc<AtomicBool>,
    pub fail_disconnect: Arc<AtomicBool>,
    next_id: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait::async_trait]
impl VoiceTransport for FakeTransport {
    async fn connect(&self, channel: &ChannelRef) -> Result<Box<dyn VoiceHandle>> {
        // Yield so concurrent connects genuinely interleave
        tokio::time::sleep(Duration::from_millis(5)).await;

        if self.fail_connect.load(Ordering::SeqCst) {
            bail!("Timed out connecting to voice.");
        }

        let connection_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.connects.fetch_add(1, Ordering::SeqCst);
        self.log
            .connections
            .lock()
            .unwrap()
            .push((channel.guild_id, connection_id));

        Ok(Box::new(FakeHandle {
            channel: channel.clone(),
            connection_id,
            sinks: 0,
            log: Arc::clone(&self.log),
            fail_sink_close: Arc::clone(&self.fail_sink_close),
            fail_disconnect: Arc::clone(&self.fail_disconnect),
        }))
    }
}

pub struct FakeHandle {
    channel: ChannelRef,
    connection_id: usize,
    sinks: usize,
    log: Arc<TransportLog>,
    fail_sink_close: Arc<AtomicBool>,
    fail_disconnect: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl VoiceHandle for FakeHandle {
    fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    async fn open_sink(&mut self) -> Result<Box<dyn Sink>> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.sinks += 1;
        self.log.sinks_opened.fetch_add(1, Ordering::SeqCst);
        let sink_id = format!("sink-{}-{}", self.connection_id, self.sinks);
        Ok(Box::new(FakeSink {
            descriptor: SinkDescriptor {
                audio_subject: format!("audio.{}", sink_id),
                sink_id,
            },
            log: Arc::clone(&self.log),
            fail_close: Arc::clone(&self.fail_sink_close),
        }))
    }

    async fn set_self_mute(&mut self, _muted: bool) -> Result<()> {
        self.log.mutes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.log.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect.load(Ordering::SeqCst) {
            bail!("voice websocket already closed");
        }
        Ok(())
    }
}

pub struct FakeSink {
    descriptor: SinkDescriptor,
    log: Arc<TransportLog>,
    fail_close: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl Sink for FakeSink {
    fn descriptor(&self) -> &SinkDescriptor {
        &self.descriptor
    }

    async fn close(&mut self) -> Result<()> {
        self.log.sinks_closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            bail!("sink already gone");
        }
        Ok(())
    }
}

/// Transcription engine that remembers every notification
#[derive(Default)]
pub struct CountingEngine {
    pub opened: Mutex<Vec<(GuildId, String)>>,
    pub closed: Mutex<Vec<GuildId>>,
}

impl CountingEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn opened_for(&self, guild_id: GuildId) -> usize {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .filter(|(g, _)| *g == guild_id)
            .count()
    }

    pub fn closed_for(&self, guild_id: GuildId) -> usize {
        self.closed
            .lock()
            .unwrap()
            .iter()
            .filter(|g| **g == guild_id)
            .count()
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for CountingEngine {
    async fn on_sink_opened(&self, guild_id: GuildId, sink: &SinkDescriptor) {
        self.opened
            .lock()
            .unwrap()
            .push((guild_id, sink.sink_id.clone()));
    }

    async fn on_sink_closed(&self, guild_id: GuildId) {
        self.closed.lock().unwrap().push(guild_id);
    }
}

pub struct Harness {
    pub bot: Arc<Bot>,
    pub transport: Arc<FakeTransport>,
    pub engine: Arc<CountingEngine>,
}

/// Bot wired to fakes, not yet ready
pub fn harness_with(voice: VoiceConfig) -> Harness {
    let transport = FakeTransport::new();
    let engine = CountingEngine::new();
    let bot = Arc::new(Bot::new(transport.clone(), engine.clone(), &voice));
    Harness {
        bot,
        transport,
        engine,
    }
}

/// Bot wired to fakes that has already seen the gateway `Ready` event
pub async fn ready_harness() -> Harness {
    let harness = harness_with(VoiceConfig::default());
    harness
        .bot
        .handle_event(GatewayEvent::Ready { user_id: BOT_USER })
        .await;
    harness
}

pub fn channel(guild: u64, channel: u64) -> ChannelRef {
    ChannelRef {
        guild_id: GuildId(guild),
        channel_id: ChannelId(channel),
        name: format!("voice-{}", channel),
    }
}

/// Command context for a caller sitting in `voice-<channel>`
pub fn ctx_in_channel(guild: u64, channel_id: u64) -> CommandContext {
    CommandContext {
        guild_id: GuildId(guild),
        user_id: CALLER,
        voice_channel: Some(channel(guild, channel_id)),
    }
}

/// Command context for a caller outside any voice channel
pub fn ctx_outside(guild: u64) -> CommandContext {
    CommandContext {
        guild_id: GuildId(guild),
        user_id: CALLER,
        voice_channel: None,
    }
}

/// Assert the session invariant for a guild, if it has a session
pub async fn assert_invariant(bot: &Bot, guild_id: GuildId) {
    let guard = bot.registry().lock(guild_id).await;
    if let Some(session) = guard.session() {
        assert!(session.invariant_holds(), "invariant broken for {}", guild_id);
        assert!(!session.is_vacant(), "vacant session retained for {}", guild_id);
    }
}
