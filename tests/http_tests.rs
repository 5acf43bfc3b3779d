// HTTP API tests driven through the router with tower's oneshot, using a
// stubbed analysis pipeline so no external services are required.

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use hound::{SampleFormat, WavSpec, WavWriter};
use phonolab::align::ForcedAligner;
use phonolab::analyzer::PronunciationAnalyzer;
use phonolab::config::AnalysisConfig;
use phonolab::recognize::PhonemeRecognizer;
use phonolab::{create_router, AppState};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

struct StubAligner;

#[async_trait]
impl ForcedAligner for StubAligner {
    async fn align(&self, _transcript: &str, _wav_path: &Path) -> Result<Vec<String>> {
        Ok(vec!["dh".to_string(), "ah".to_string()])
    }
}

struct StubRecognizer;

#[async_trait]
impl PhonemeRecognizer for StubRecognizer {
    async fn recognize(&self, _wav_path: &Path) -> Result<Vec<String>> {
        Ok(vec!["dh".to_string(), "ah".to_string()])
    }
}

fn test_router() -> axum::Router {
    let analyzer = PronunciationAnalyzer::new(
        Box::new(StubAligner),
        Box::new(StubRecognizer),
        &AnalysisConfig::default(),
    );
    create_router(AppState::new(Arc::new(analyzer)))
}

/// A small valid WAV, generated in memory.
fn wav_bytes() -> Vec<u8> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..16000 {
            let t = i as f32 / 16000.0;
            let value = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
            writer.write_sample((value * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

const BOUNDARY: &str = "phonolab-test-boundary";

/// Hand-rolled multipart/form-data body with a transcript part and an audio
/// part carrying the given content type.
fn multipart_body(transcript: &str, audio: &[u8], audio_content_type: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"transcript\"\r\n\r\n\
             {transcript}\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"audio\"; filename=\"attempt.wav\"\r\n\
             Content-Type: {audio_content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(audio);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn analyze_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_analyze_returns_report() -> Result<()> {
    let body = multipart_body("the monkey", &wav_bytes(), "audio/wav");
    let response = test_router().oneshot(analyze_request(body)).await?;

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let report: serde_json::Value = serde_json::from_slice(&bytes)?;

    assert_eq!(report["target"], "the monkey");
    assert_eq!(report["ref_phonemes"], serde_json::json!(["dh", "ah"]));
    assert_eq!(report["child_phonemes"], serde_json::json!(["dh", "ah"]));
    assert_eq!(report["error_info"]["error_rate"], 0.0);
    assert_eq!(report["error_info"]["is_correct"], true);

    Ok(())
}

#[tokio::test]
async fn test_analyze_rejects_unknown_content_type() -> Result<()> {
    let body = multipart_body("the monkey", &wav_bytes(), "video/mp4");
    let response = test_router().oneshot(analyze_request(body)).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let error: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(error["error"], "Invalid audio format");

    Ok(())
}

#[tokio::test]
async fn test_analyze_accepts_octet_stream_uploads() -> Result<()> {
    // Generic clients send application/octet-stream for file parts
    let body = multipart_body("the monkey", &wav_bytes(), "application/octet-stream");
    let response = test_router().oneshot(analyze_request(body)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_analyze_requires_both_fields() -> Result<()> {
    // Transcript only, no audio part
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"transcript\"\r\n\r\n\
             hello\r\n\
             --{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );

    let response = test_router().oneshot(analyze_request(body)).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_analyze_rejects_undecodable_audio() -> Result<()> {
    // Valid content type but garbage bytes: pipeline fails, surfaced as 500
    let body = multipart_body("the monkey", b"not really audio", "audio/wav");
    let response = test_router().oneshot(analyze_request(body)).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}
