use super::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Audio content types accepted for upload (WAV, M4A, MP3 and the generic
/// fallback most HTTP clients send for file parts).
const ALLOWED_AUDIO_TYPES: &[&str] = &[
    "audio/wav",
    "audio/x-wav",
    "audio/mpeg",
    "audio/mp3",
    "audio/x-m4a",
    "audio/m4a",
    "application/octet-stream",
];

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: impl Into<String>) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /analyze
/// Multipart upload: `transcript` (text) + `audio` (file).
/// Returns the full analysis report as JSON.
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut transcript: Option<String> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return bad_request(format!("Malformed multipart body: {}", e)),
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("transcript") => match field.text().await {
                Ok(text) => transcript = Some(text),
                Err(e) => return bad_request(format!("Unreadable transcript field: {}", e)),
            },
            Some("audio") => {
                let content_type = field.content_type().unwrap_or("").to_string();
                if !ALLOWED_AUDIO_TYPES.contains(&content_type.as_str()) {
                    return bad_request("Invalid audio format");
                }

                let filename = field.file_name().unwrap_or("upload.wav").to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((filename, bytes.to_vec())),
                    Err(e) => return bad_request(format!("Unreadable audio field: {}", e)),
                }
            }
            _ => {}
        }
    }

    let Some(transcript) = transcript else {
        return bad_request("Missing transcript field");
    };
    let Some((filename, bytes)) = upload else {
        return bad_request("Missing audio field");
    };

    info!(
        "Analysis request: \"{}\", {} bytes of audio ({})",
        transcript,
        bytes.len(),
        filename
    );

    // Keep the upload's extension so the decoder can probe the container
    let suffix = Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_else(|| ".wav".to_string());

    // Scoped upload file, removed when the guard drops
    let tmp = match tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&suffix)
        .tempfile()
    {
        Ok(mut tmp) => {
            if let Err(e) = tmp.write_all(&bytes) {
                error!("Failed to store upload: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: format!("Failed to store upload: {}", e),
                    }),
                )
                    .into_response();
            }
            tmp
        }
        Err(e) => {
            error!("Failed to create temporary file: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to store upload: {}", e),
                }),
            )
                .into_response();
        }
    };

    match state.analyzer.analyze(&transcript, tmp.path()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Analysis failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
