//! Video generation endpoint
//!
//! `POST /generate-video` runs the whole pipeline inside the request and
//! answers once the video is ready (or the pipeline failed). Expect multi
//! minute responses; clients must use a long read timeout.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::models::{GenerationRequest, GenerationResponse};
use crate::AppState;

/// POST /generate-video
pub async fn generate_video(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> ApiResult<Json<GenerationResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let run = state.orchestrator.run(request).await?;

    // Notification task runs on; the response does not wait for it
    drop(run.notification);

    Ok(Json(GenerationResponse::succeeded(run.result)))
}

/// Build generation routes
pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/generate-video", post(generate_video))
}
