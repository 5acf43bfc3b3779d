//! Deterministic, stateless audio cleanup applied before analysis:
//! peak normalization into [-1, 1] and leading/trailing silence removal.

use anyhow::Result;
use std::path::Path;

use super::file::AudioFile;
use super::resample::resample;

/// Frame length used for silence detection (samples).
const TRIM_FRAME_LEN: usize = 2048;
/// Hop between silence-detection frames (samples).
const TRIM_HOP: usize = 512;

/// Rescale samples so the peak absolute amplitude is 1.0.
///
/// A silent signal (peak of zero) is left untouched.
pub fn peak_normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |max, s| max.max(s.abs()));
    if peak > 0.0 {
        for sample in samples.iter_mut() {
            *sample /= peak;
        }
    }
}

/// Trim leading and trailing frames quieter than `top_db` decibels below the
/// loudest frame, measured by per-frame RMS.
///
/// An entirely silent signal trims to an empty slice.
pub fn trim_silence(samples: &[f32], top_db: f32) -> &[f32] {
    if samples.is_empty() {
        return samples;
    }

    let mut frame_rms = Vec::new();
    let mut start = 0;
    while start < samples.len() {
        let end = (start + TRIM_FRAME_LEN).min(samples.len());
        let frame = &samples[start..end];
        let energy: f32 = frame.iter().map(|s| s * s).sum();
        frame_rms.push((energy / frame.len() as f32).sqrt());
        start += TRIM_HOP;
    }

    let max_rms = frame_rms.iter().fold(0.0f32, |max, &r| max.max(r));
    if max_rms <= 0.0 {
        return &samples[0..0];
    }

    // A frame is kept when its level is within top_db of the loudest frame
    let is_voiced = |rms: f32| 20.0 * (rms / max_rms).log10() > -top_db;

    let first = frame_rms.iter().position(|&r| is_voiced(r));
    let last = frame_rms.iter().rposition(|&r| is_voiced(r));

    match (first, last) {
        (Some(first), Some(last)) => {
            let begin = first * TRIM_HOP;
            let end = (last * TRIM_HOP + TRIM_FRAME_LEN).min(samples.len());
            &samples[begin..end]
        }
        _ => &samples[0..0],
    }
}

/// Load, downmix, resample, normalize and trim a recording, returning mono
/// samples at `target_rate` ready for alignment and recognition.
pub fn preprocess(path: impl AsRef<Path>, target_rate: u32, top_db: f32) -> Result<Vec<f32>> {
    let audio = AudioFile::open(path)?;
    let mono = audio.to_mono();
    let mut samples = resample(&mono, audio.sample_rate, target_rate);

    peak_normalize(&mut samples);
    let trimmed = trim_silence(&samples, top_db);

    Ok(trimmed.to_vec())
}
