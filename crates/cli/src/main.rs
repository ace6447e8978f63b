mod health;

use std::{sync::Arc, time::Duration};

use {
    clap::Parser,
    secrecy::Secret,
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    membot_engine::Engine,
    membot_memory::{MemoryServiceClient, MemoryServiceConfig},
    membot_rocketchat::{RocketChatClient, RocketChatConfig},
};

#[derive(Parser)]
#[command(name = "membot", about = "membot — memory-backed chat reply bot")]
struct Cli {
    /// Rocket.Chat server URL.
    #[arg(long, env = "ROCKETCHAT_URL")]
    rocketchat_url: String,

    /// Bot account username.
    #[arg(long, env = "ROCKETCHAT_USER")]
    rocketchat_user: String,

    /// Bot account password.
    #[arg(long, env = "ROCKETCHAT_PASSWORD", hide_env_values = true)]
    rocketchat_password: String,

    /// Memory service base URL.
    #[arg(long, env = "MEMORY_SERVICE_URL", default_value = "http://localhost:8000")]
    memory_service_url: String,

    /// Seconds between polling cycles.
    #[arg(long, env = "MEMBOT_POLL_INTERVAL", default_value_t = 5)]
    interval: u64,

    /// Bind address for the health endpoint.
    #[arg(long, env = "MEMBOT_HEALTH_BIND", default_value = "127.0.0.1:8080")]
    health_bind: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "membot starting");

    let memory_config = MemoryServiceConfig::new(&cli.memory_service_url)?;
    let memory = Arc::new(MemoryServiceClient::new(&memory_config)?);
    match memory.health().await {
        Ok(report) => info!(status = %report.status, "memory service reachable"),
        Err(e) => warn!(error = %e, "memory service health probe failed, starting anyway"),
    }

    let chat_config = RocketChatConfig::new(
        &cli.rocketchat_url,
        &cli.rocketchat_user,
        Secret::new(cli.rocketchat_password.clone()),
    )?;
    let chat = Arc::new(RocketChatClient::connect(chat_config).await?);
    let bot_username = chat.username().to_string();

    let engine = Engine::new(Arc::clone(&chat), memory, bot_username)
        .with_poll_interval(Duration::from_secs(cli.interval));

    let cancel = CancellationToken::new();
    tokio::spawn(health::serve(cli.health_bind.clone(), cancel.clone()));

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
            cancel.cancel();
        });
    }

    engine.run(cancel).await;
    info!("membot stopped");
    Ok(())
}
