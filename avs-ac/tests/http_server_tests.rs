//! HTTP routing and upload validation tests for avs-ac

use avs_ac::{build_router, AppState};
use avs_common::audio::Transcoder;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "avs-test-boundary";

/// Transcoder pointed at a binary that does not exist
fn test_state() -> AppState {
    AppState::new(Transcoder::new().with_ffmpeg_path("/nonexistent/ffmpeg"))
}

/// Build a multipart body with a single part
fn multipart_body(field: &str, file_name: Option<&str>, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match file_name {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: audio/mpeg\r\n\r\n",
                field, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
        ),
    }
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn convert_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_service_name() {
    let app = build_router(test_state());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "audio-converter");
    assert_eq!(json["ffmpeg_available"], false);
}

#[tokio::test]
async fn root_lists_convert_endpoint() {
    let app = build_router(test_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let paths: Vec<&str> = json["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"/convert"));
}

#[tokio::test]
async fn missing_file_part_is_400() {
    let app = build_router(test_state());

    let body = multipart_body("other", Some("song.mp3"), b"data");
    let response = app.oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No file part");
}

#[tokio::test]
async fn non_multipart_body_is_400() {
    let app = build_router(test_state());

    let request = Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No file part");
}

#[tokio::test]
async fn empty_filename_is_400() {
    let app = build_router(test_state());

    let body = multipart_body("file", Some(""), b"data");
    let response = app.oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No selected file");
}

#[tokio::test]
async fn wrong_extension_is_400() {
    let app = build_router(test_state());

    let body = multipart_body("file", Some("song.wav"), b"RIFF....");
    let response = app.oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Invalid file type, please upload an MP3 file"
    );
}

#[tokio::test]
async fn transcode_failure_is_500_with_error_body() {
    let scratch = tempfile::tempdir().unwrap();
    let state = AppState::new(
        Transcoder::new()
            .with_ffmpeg_path("/nonexistent/ffmpeg")
            .with_scratch_dir(scratch.path()),
    );
    let app = build_router(state);

    let body = multipart_body("file", Some("song.mp3"), b"not really audio");
    let response = app.oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("ffmpeg"));
    assert!(std::fs::read_dir(scratch.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = build_router(test_state().with_max_upload_bytes(1024));

    let body = multipart_body("file", Some("song.mp3"), &vec![0u8; 8 * 1024]);
    let response = app.oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
