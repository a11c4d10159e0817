//! avs-ac library interface for testing
//!
//! Audio Converter service: accepts an MP3 upload and returns an MPEG
//! (Layer II) rendition produced by ffmpeg.

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use avs_common::audio::Transcoder;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Default upload limit (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Transcoder configured for MPEG output
    pub transcoder: Arc<Transcoder>,
    /// Maximum accepted request body size
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(transcoder: Transcoder) -> Self {
        Self {
            transcoder: Arc::new(transcoder),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}

/// Version plus build identification captured by `build.rs`
pub fn build_info() -> String {
    format!(
        "v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    )
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::convert_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
