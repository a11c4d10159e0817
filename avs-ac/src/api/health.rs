//! Health check and service metadata endpoints

use avs_common::api::{EndpointInfo, ServiceInfo};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

pub const SERVICE_NAME: &str = "audio-converter";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    pub service: String,
    pub version: String,
    /// Whether the ffmpeg binary can be started
    pub ffmpeg_available: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let transcoder = state.transcoder.clone();
    let ffmpeg_available = tokio::task::spawn_blocking(move || transcoder.is_available())
        .await
        .unwrap_or(false);

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ffmpeg_available,
    })
}

/// GET /
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Converts uploaded MP3 audio to MPEG (Layer II)".to_string(),
        endpoints: vec![
            EndpointInfo::new("POST", "/convert", "Multipart field `file` (.mp3) -> audio/mpeg attachment"),
            EndpointInfo::new("GET", "/health", "Health check"),
            EndpointInfo::new("GET", "/", "Service metadata"),
        ],
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(service_info))
}
