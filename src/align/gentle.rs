use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use super::ForcedAligner;

/// HTTP client for a Gentle forced-alignment server.
///
/// Alignment failures (unreachable server, non-2xx status, malformed JSON)
/// degrade to an empty phoneme list with a warning instead of failing the
/// request; the caller decides how to treat an empty reference.
pub struct GentleClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Transcription {
    #[serde(default)]
    words: Vec<AlignedWord>,
}

#[derive(Debug, Deserialize)]
struct AlignedWord {
    #[serde(default)]
    phones: Vec<AlignedPhone>,
}

#[derive(Debug, Deserialize)]
struct AlignedPhone {
    #[serde(default)]
    phone: String,
}

impl GentleClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for Gentle")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Flatten a Gentle transcription into its ordered phoneme labels.
    fn flatten_phones(transcription: Transcription) -> Vec<String> {
        transcription
            .words
            .into_iter()
            .flat_map(|word| word.phones)
            .map(|p| p.phone)
            .collect()
    }
}

#[async_trait::async_trait]
impl ForcedAligner for GentleClient {
    async fn align(&self, transcript: &str, wav_path: &Path) -> Result<Vec<String>> {
        // A local read failure is our bug, not the service's; propagate it.
        let audio = tokio::fs::read(wav_path)
            .await
            .with_context(|| format!("Failed to read {}", wav_path.display()))?;

        let form = Form::new()
            .text("transcript", transcript.to_string())
            .part(
                "audio",
                Part::bytes(audio)
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .context("Invalid audio MIME type")?,
            );

        let url = format!("{}/transcriptions?async=false", self.base_url);
        debug!("Requesting forced alignment from {}", url);

        let response = match self.client.post(&url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Forced alignment request failed: {}", e);
                return Ok(Vec::new());
            }
        };

        if !response.status().is_success() {
            warn!(
                "Forced alignment server returned status {}",
                response.status()
            );
            return Ok(Vec::new());
        }

        let transcription: Transcription = match response.json().await {
            Ok(transcription) => transcription,
            Err(e) => {
                warn!("Failed to parse forced alignment response: {}", e);
                return Ok(Vec::new());
            }
        };

        Ok(Self::flatten_phones(transcription))
    }
}
