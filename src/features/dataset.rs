//! Batch feature extraction over a labeled recording dataset.
//!
//! The manifest is a JSON array of `{file, label}` entries pointing into an
//! audio directory; output is one mean-MFCC vector per clip plus its
//! phonological-error label, ready for classifier training elsewhere.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::audio::{resample, AudioFile};
use super::mfcc::{MfccConfig, MfccExtractor};

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    /// Audio file name, relative to the dataset audio directory
    pub file: String,
    /// Phonological error description used as the class label
    pub label: String,
}

/// Extracted features for the whole dataset.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureSet {
    pub extracted_at: DateTime<Utc>,
    pub n_mfcc: usize,
    pub features: Vec<Vec<f32>>,
    pub labels: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub extracted: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Extract mean MFCCs for every clip in the manifest and write the feature
/// set to `out_path` as JSON.
///
/// Missing files and clips that fail to decode are logged and skipped;
/// a clip-level failure never aborts the batch.
pub fn extract_dataset(
    manifest_path: &Path,
    audio_dir: &Path,
    out_path: &Path,
    config: MfccConfig,
) -> Result<DatasetSummary> {
    let manifest_text = fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;
    let entries: Vec<ManifestEntry> =
        serde_json::from_str(&manifest_text).context("Malformed dataset manifest")?;

    info!(
        "Extracting features for {} clips from {}",
        entries.len(),
        audio_dir.display()
    );

    let sample_rate = config.sample_rate;
    let n_mfcc = config.n_mfcc;
    let mut extractor = MfccExtractor::new(config)?;

    let mut summary = DatasetSummary {
        total: entries.len(),
        ..DatasetSummary::default()
    };
    let mut features = Vec::new();
    let mut labels = Vec::new();

    for entry in entries {
        let clip_path = audio_dir.join(&entry.file);
        if !clip_path.is_file() {
            warn!("Missing audio file: {}", clip_path.display());
            summary.missing += 1;
            continue;
        }

        match extract_clip(&mut extractor, &clip_path, sample_rate) {
            Ok(mfcc) => {
                features.push(mfcc);
                labels.push(entry.label);
                summary.extracted += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {:#}", clip_path.display(), e);
                summary.failed += 1;
            }
        }
    }

    let feature_set = FeatureSet {
        extracted_at: Utc::now(),
        n_mfcc,
        features,
        labels,
    };

    let json = serde_json::to_string_pretty(&feature_set)
        .context("Failed to serialize feature set")?;
    fs::write(out_path, json)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    info!(
        "Feature extraction complete: {}/{} clips extracted ({} missing, {} failed)",
        summary.extracted, summary.total, summary.missing, summary.failed
    );

    Ok(summary)
}

fn extract_clip(
    extractor: &mut MfccExtractor,
    path: &Path,
    sample_rate: u32,
) -> Result<Vec<f32>> {
    let audio = AudioFile::open(path)?;
    let mono = audio.to_mono();
    let samples = resample(&mono, audio.sample_rate, sample_rate);
    extractor.mean_mfcc(&samples)
}
