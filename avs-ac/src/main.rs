//! avs-ac - Audio Converter microservice
//!
//! Accepts an MP3 upload on `POST /convert` and returns the MPEG (Layer II)
//! rendition produced by ffmpeg.

use anyhow::{Context, Result};
use avs_common::audio::Transcoder;
use avs_common::config::SettingsSource;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

use avs_ac::{build_info, build_router, AppState, DEFAULT_MAX_UPLOAD_BYTES};

/// Command-line arguments for avs-ac
#[derive(Parser, Debug)]
#[command(name = "avs-ac")]
#[command(about = "Audio Converter microservice (MP3 -> MPEG)")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "AVS_BIND_ADDR")]
    bind: std::net::IpAddr,

    /// Maximum upload size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "AVS_MAX_UPLOAD_BYTES")]
    max_upload_bytes: usize,

    /// Directory for per-request temp files (defaults to the OS temp dir)
    #[arg(long, env = "AVS_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    avs_common::logging::init_tracing("avs_ac=info,avs_common=info,tower_http=info");

    info!("Starting AVS Audio Converter (avs-ac) {}", build_info());

    let args = Args::parse();
    let settings = SettingsSource::load().context("Failed to load configuration")?;

    let mut transcoder =
        Transcoder::new().with_ffmpeg_path(settings.get_or("FFMPEG_PATH", "ffmpeg"));
    if let Some(dir) = args.scratch_dir {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create scratch dir {}", dir.display()))?;
        transcoder = transcoder.with_scratch_dir(dir);
    }

    if transcoder.is_available() {
        info!(ffmpeg = %transcoder.ffmpeg_path().display(), "ffmpeg available");
    } else {
        warn!(
            ffmpeg = %transcoder.ffmpeg_path().display(),
            "ffmpeg not found - /convert will fail until it is installed"
        );
    }

    let state = AppState::new(transcoder).with_max_upload_bytes(args.max_upload_bytes);
    let app = build_router(state);

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
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
}
