//! avs-vg library interface for testing
//!
//! Video Generator service: script -> speech -> MPEG audio -> uploaded
//! asset -> avatar video, with an optional chat notification at the end.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod orchestrator;
pub mod poller;
pub mod providers;
pub mod stages;

pub use crate::error::{ApiError, ApiResult, WorkflowError};
pub use crate::orchestrator::{Stages, WorkflowOrchestrator, WorkflowRun};

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<WorkflowOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: WorkflowOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
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
    Router::new()
        .merge(api::generate_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
