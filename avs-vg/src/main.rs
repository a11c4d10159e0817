//! avs-vg - Video Generator microservice
//!
//! Accepts a script on `POST /generate-video`, narrates it, builds an avatar
//! video with it and answers with the finished video's URL.

use anyhow::{Context, Result};
use avs_common::config::SettingsSource;
use clap::Parser;
use std::net::SocketAddr;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use avs_vg::config::VideoGenConfig;
use avs_vg::{build_info, build_router, AppState, WorkflowOrchestrator};

/// Command-line arguments for avs-vg
#[derive(Parser, Debug)]
#[command(name = "avs-vg")]
#[command(about = "Video Generator microservice (script -> avatar video)")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "AVS_BIND_ADDR")]
    bind: std::net::IpAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    avs_common::logging::init_tracing("avs_vg=info,avs_common=info,tower_http=info");

    info!("Starting AVS Video Generator (avs-vg) {}", build_info());

    let args = Args::parse();
    let settings = SettingsSource::load().context("Failed to load configuration")?;
    let config = VideoGenConfig::from_settings(&settings).context("Invalid configuration")?;

    info!(
        voice_id = %config.speech.voice_id,
        avatar_id = %config.video.avatar_id,
        max_attempts = config.poll.max_attempts,
        interval_secs = config.poll.interval.as_secs(),
        worst_case_wait_secs = config.poll.worst_case_wait().as_secs(),
        "Configuration loaded"
    );

    let shutdown = CancellationToken::new();
    let orchestrator = WorkflowOrchestrator::from_config(&config, shutdown.clone())
        .context("Failed to initialize provider clients")?;

    let app = build_router(AppState::new(orchestrator));

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM, cancelling in-flight polls first
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }

    token.cancel();
}
