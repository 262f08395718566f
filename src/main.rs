use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, Level};
use volo_voice::gateway::run_nats_gateway;
use volo_voice::{
    create_router, AppState, Bot, Config, NatsClient, NatsTranscriptionNotifier,
    NatsVoiceTransport,
};

#[derive(Debug, Parser)]
#[command(name = "volo", about = "Voice channel transcription bot")]
struct Cli {
    /// Config file, extension optional
    #[arg(short, long, default_value = "config/volo")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let cfg = Config::load(&cli.config)?;

    info!("Volo v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    let nats = NatsClient::connect(&cfg.nats.url, cfg.nats.subject_prefix.clone()).await?;

    let bot = Arc::new(Bot::new(
        Arc::new(NatsVoiceTransport::new(nats.clone())),
        Arc::new(NatsTranscriptionNotifier::new(nats.clone())),
        &cfg.voice,
    ));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let router = create_router(AppState::new(Arc::clone(bot.registry())));
    info!("Status API listening on {}", addr);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("Status API stopped: {}", e);
        }
    });

    tokio::select! {
        result = run_nats_gateway(Arc::clone(&bot), nats) => {
            if let Err(e) = result {
                error!("Gateway bridge failed: {:#}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("^C received, shutting down...");
        }
    }

    bot.shutdown().await;

    Ok(())
}
