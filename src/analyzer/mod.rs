//! The combined pronunciation analysis pipeline:
//! preprocess → forced-align → recognize → align-and-score.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::align::ForcedAligner;
use crate::audio;
use crate::config::AnalysisConfig;
use crate::recognize::PhonemeRecognizer;
use crate::score::{score, ErrorReport};

/// Result of analyzing one recording against its target sentence.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub target: String,
    pub ref_phonemes: Vec<String>,
    pub child_phonemes: Vec<String>,
    pub error_info: ErrorReport,
}

pub struct PronunciationAnalyzer {
    aligner: Box<dyn ForcedAligner>,
    recognizer: Box<dyn PhonemeRecognizer>,
    sample_rate: u32,
    trim_top_db: f32,
    error_rate_threshold: f64,
}

impl PronunciationAnalyzer {
    pub fn new(
        aligner: Box<dyn ForcedAligner>,
        recognizer: Box<dyn PhonemeRecognizer>,
        analysis: &AnalysisConfig,
    ) -> Self {
        Self {
            aligner,
            recognizer,
            sample_rate: analysis.sample_rate,
            trim_top_db: analysis.trim_top_db,
            error_rate_threshold: analysis.error_rate_threshold,
        }
    }

    /// Run the full pipeline for one recording.
    ///
    /// The cleaned audio lives in a temporary WAV that is removed on every
    /// exit path, success or error.
    pub async fn analyze(
        &self,
        target_sentence: &str,
        audio_path: &Path,
    ) -> Result<AnalysisReport> {
        info!("Analyzing pronunciation of \"{}\"", target_sentence);

        let samples = audio::preprocess(audio_path, self.sample_rate, self.trim_top_db)?;

        let clean_wav = tempfile::Builder::new()
            .prefix("phonolab-")
            .suffix(".wav")
            .tempfile()
            .context("Failed to create temporary WAV")?;
        audio::write_wav_mono16(clean_wav.path(), &samples, self.sample_rate)?;

        let ref_phonemes = self.aligner.align(target_sentence, clean_wav.path()).await?;
        if ref_phonemes.is_empty() {
            warn!(
                "Forced alignment produced no reference phonemes for \"{}\"",
                target_sentence
            );
        }

        let child_phonemes = self.recognizer.recognize(clean_wav.path()).await?;

        let error_info = score(&ref_phonemes, &child_phonemes, self.error_rate_threshold);

        info!(
            "Analysis complete: {} reference phonemes, {} recognized, error rate {:.3}",
            ref_phonemes.len(),
            child_phonemes.len(),
            error_info.error_rate
        );

        Ok(AnalysisReport {
            target: target_sentence.to_string(),
            ref_phonemes,
            child_phonemes,
            error_info,
        })
    }
}
