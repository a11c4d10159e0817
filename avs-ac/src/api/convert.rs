//! POST /convert
//!
//! Multipart upload of an `.mp3` in the `file` field; responds with the MPEG
//! rendition as an attachment.

use avs_common::audio::{AudioBuffer, AudioCodec};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

/// Uploaded file pulled out of the multipart body
#[derive(Debug)]
struct Upload {
    file_name: String,
    data: Vec<u8>,
}

/// POST /convert
pub async fn convert_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let multipart = multipart.map_err(|_| ApiError::BadRequest("No file part".to_string()))?;
    let upload = read_upload(multipart).await?;

    if upload.file_name.trim().is_empty() {
        return Err(ApiError::BadRequest("No selected file".to_string()));
    }
    if !is_mp3_name(&upload.file_name) {
        return Err(ApiError::BadRequest(
            "Invalid file type, please upload an MP3 file".to_string(),
        ));
    }

    tracing::info!(
        file_name = %upload.file_name,
        bytes = upload.data.len(),
        "Converting upload"
    );

    let converted = state
        .transcoder
        .transcode(AudioBuffer::new(upload.data, AudioCodec::Mp3))
        .await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        download_name(&upload.file_name, converted.codec)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| ApiError::Internal(format!("Invalid download name: {}", e)))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(converted.codec.mime_type())),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache, max-age=0")),
        ],
        converted.into_bytes(),
    )
        .into_response())
}

/// Find the `file` field; other fields are skipped
async fn read_upload(mut multipart: Multipart) -> ApiResult<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok(Upload {
            file_name,
            data: data.to_vec(),
        });
    }

    Err(ApiError::BadRequest("No file part".to_string()))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

/// `.mp3` extension check (case-insensitive)
pub fn is_mp3_name(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".mp3")
}

/// Attachment name: base name of the upload with the target extension.
///
/// Directory parts are dropped and characters that cannot appear in a quoted
/// header value are replaced with `_`.
pub fn download_name(file_name: &str, codec: AudioCodec) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let stem = match base.len().checked_sub(4) {
        Some(cut) if is_mp3_name(base) => &base[..cut],
        _ => base,
    };

    let safe: String = stem
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = if safe.trim().is_empty() { "audio" } else { safe.as_str() };
    format!("{}.{}", stem, codec.extension())
}

/// Build conversion routes
pub fn convert_routes() -> Router<AppState> {
    Router::new().route("/convert", post(convert_audio))
}
