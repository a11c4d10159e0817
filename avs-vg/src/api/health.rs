//! Health check and service metadata endpoints

use avs_common::api::{EndpointInfo, ServiceInfo};
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

pub const SERVICE_NAME: &str = "video-generator";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /health
///
/// Liveness only; providers are not contacted.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Turns a script into an avatar video (speech, conversion, upload, synthesis)"
            .to_string(),
        endpoints: vec![
            EndpointInfo::new(
                "POST",
                "/generate-video",
                "JSON {Script, Titulo?, Referencias?} -> {success, message, data}",
            ),
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
