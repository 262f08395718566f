// Integration tests for teardown: forced disconnects from the platform and
// the /disconnect command must end in the same state.

mod common;

use common::{ctx_in_channel, harness_with, ready_harness, TransportLog, BOT_USER, CALLER};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use volo_voice::config::VoiceConfig;
use volo_voice::{
    ChannelId, DisconnectCause, GatewayEvent, GuildId, VoiceError, VoiceStateUpdate,
};

const G1: GuildId = GuildId(1);

fn bot_left(guild_id: GuildId) -> GatewayEvent {
    GatewayEvent::VoiceStateUpdate(VoiceStateUpdate {
        guild_id,
        user_id: BOT_USER,
        before_channel: Some(ChannelId(10)),
        after_channel: None,
    })
}

#[tokio::test]
async fn test_forced_disconnect_while_recording_cleans_up_once() {
    let h = ready_harness().await;
    h.bot.commands().connect(&ctx_in_channel(1, 10)).await.unwrap();
    h.bot.commands().transcribe(&ctx_in_channel(1, 10)).await.unwrap();

    let response = h.bot.handle_event(bot_left(G1)).await;
    assert!(response.is_none());

    assert!(h.bot.registry().get(G1).is_none());
    assert_eq!(h.engine.closed_for(G1), 1);
    assert_eq!(TransportLog::count(&h.transport.log.sinks_closed), 1);
    assert_eq!(TransportLog::count(&h.transport.log.disconnects), 1);

    // The platform may repeat the event; nothing more happens
    h.bot.handle_event(bot_left(G1)).await;
    assert_eq!(h.engine.closed_for(G1), 1);
    assert_eq!(TransportLog::count(&h.transport.log.disconnects), 1);
}

#[tokio::test]
async fn test_unrelated_voice_updates_are_ignored() {
    let h = ready_harness().await;
    h.bot.commands().connect(&ctx_in_channel(1, 10)).await.unwrap();

    // Another member leaving
    h.bot
        .handle_event(GatewayEvent::VoiceStateUpdate(VoiceStateUpdate {
            guild_id: G1,
            user_id: CALLER,
            before_channel: Some(ChannelId(10)),
            after_channel: None,
        }))
        .await;

    // The bot being moved, not removed
    h.bot
        .handle_event(GatewayEvent::VoiceStateUpdate(VoiceStateUpdate {
            guild_id: G1,
            user_id: BOT_USER,
            before_channel: Some(ChannelId(10)),
            after_channel: Some(ChannelId(11)),
        }))
        .await;

    let snapshot = h.bot.registry().get(G1).expect("session kept");
    assert!(snapshot.is_connected);
    assert_eq!(TransportLog::count(&h.transport.log.disconnects), 0);
}

#[tokio::test]
async fn test_voice_updates_before_ready_are_ignored() {
    let h = harness_with(VoiceConfig::default());
    assert!(h.bot.lifecycle().bot_user().is_none());

    h.bot.handle_event(bot_left(G1)).await;
    assert!(h.bot.registry().is_empty());
}

#[tokio::test]
async fn test_forced_disconnect_without_session_is_harmless() {
    let h = ready_harness().await;

    h.bot.handle_event(bot_left(G1)).await;

    assert!(h.bot.registry().get(G1).is_none());
    assert_eq!(h.engine.closed_for(G1), 0);
}

#[tokio::test]
async fn test_forced_disconnect_survives_sink_close_failure() {
    let h = ready_harness().await;
    h.bot.commands().connect(&ctx_in_channel(1, 10)).await.unwrap();
    h.bot.commands().transcribe(&ctx_in_channel(1, 10)).await.unwrap();
    h.transport.fail_sink_close.store(true, Ordering::SeqCst);
    h.transport.fail_disconnect.store(true, Ordering::SeqCst);

    h.bot.handle_event(bot_left(G1)).await;

    assert!(h.bot.registry().get(G1).is_none());
    assert_eq!(h.engine.closed_for(G1), 1);
}

#[tokio::test]
async fn test_command_and_forced_paths_converge() {
    let forced = ready_harness().await;
    let command = ready_harness().await;

    for h in [&forced, &command] {
        h.bot.commands().connect(&ctx_in_channel(1, 10)).await.unwrap();
        h.bot.commands().transcribe(&ctx_in_channel(1, 10)).await.unwrap();
    }

    forced.bot.handle_event(bot_left(G1)).await;
    command
        .bot
        .commands()
        .disconnect(&ctx_in_channel(1, 10))
        .await
        .unwrap();

    for h in [&forced, &command] {
        assert!(h.bot.registry().get(G1).is_none());
        assert_eq!(h.engine.closed_for(G1), 1);
        assert_eq!(TransportLog::count(&h.transport.log.sinks_closed), 1);
        assert_eq!(TransportLog::count(&h.transport.log.disconnects), 1);
    }
}

#[tokio::test]
async fn test_command_disconnect_reports_transport_error_after_cleanup() {
    let h = ready_harness().await;
    h.bot.commands().connect(&ctx_in_channel(1, 10)).await.unwrap();
    h.transport.fail_disconnect.store(true, Ordering::SeqCst);

    let result = h.bot.lifecycle().force_stop(G1, DisconnectCause::Command).await;
    assert!(matches!(result, Err(VoiceError::Transport(_))));
    assert!(h.bot.registry().get(G1).is_none());
}

#[tokio::test]
async fn test_force_stop_reports_what_ended() {
    let h = ready_harness().await;
    h.bot.commands().connect(&ctx_in_channel(1, 10)).await.unwrap();
    h.bot.commands().transcribe(&ctx_in_channel(1, 10)).await.unwrap();

    let report = h
        .bot
        .lifecycle()
        .force_stop(G1, DisconnectCause::Forced)
        .await
        .unwrap();
    assert_eq!(report.guild_id, G1);
    assert!(report.was_recording);
    assert_eq!(report.channel.map(|c| c.channel_id), Some(ChannelId(10)));

    let again = h.bot.lifecycle().force_stop(G1, DisconnectCause::Forced).await;
    assert!(matches!(again, Err(VoiceError::NoSession)));
}

#[tokio::test]
async fn test_remove_after_forced_disconnect_is_a_no_op() {
    let h = ready_harness().await;
    h.bot.commands().connect(&ctx_in_channel(1, 10)).await.unwrap();
    h.bot.commands().transcribe(&ctx_in_channel(1, 10)).await.unwrap();

    h.bot
        .lifecycle()
        .force_stop(G1, DisconnectCause::Forced)
        .await
        .unwrap();

    assert!(h.bot.registry().remove(G1).await.is_none());
    assert!(h.bot.registry().remove(G1).await.is_none());

    assert!(h.bot.registry().get(G1).is_none());
    assert_eq!(h.engine.closed_for(G1), 1);
    assert_eq!(TransportLog::count(&h.transport.log.sinks_closed), 1);
    assert_eq!(TransportLog::count(&h.transport.log.disconnects), 1);
}

#[tokio::test]
async fn test_start_racing_forced_disconnect_never_leaks_sink() {
    for _ in 0..20 {
        let h = ready_harness().await;
        h.bot.commands().connect(&ctx_in_channel(1, 10)).await.unwrap();

        let starter = {
            let bot = Arc::clone(&h.bot);
            tokio::spawn(async move { bot.recording().start(G1).await })
        };
        let leaver = {
            let bot = Arc::clone(&h.bot);
            tokio::spawn(async move { bot.handle_event(bot_left(G1)).await })
        };

        let started = starter.await.unwrap();
        leaver.await.unwrap();

        assert!(h.bot.registry().get(G1).is_none());
        let opened = h.engine.opened_for(G1);
        assert_eq!(opened, usize::from(started.is_ok()));
        assert_eq!(h.engine.closed_for(G1), opened);
        assert_eq!(
            TransportLog::count(&h.transport.log.sinks_opened),
            TransportLog::count(&h.transport.log.sinks_closed)
        );
    }
}

#[tokio::test]
async fn test_shutdown_ends_every_session() {
    let h = ready_harness().await;
    for guild in [1, 2, 3] {
        h.bot.commands().connect(&ctx_in_channel(guild, 10)).await.unwrap();
    }
    h.bot.commands().transcribe(&ctx_in_channel(2, 10)).await.unwrap();

    h.bot.shutdown().await;

    assert!(h.bot.registry().is_empty());
    assert_eq!(h.engine.closed_for(GuildId(2)), 1);
    assert_eq!(TransportLog::count(&h.transport.log.disconnects), 3);
}
