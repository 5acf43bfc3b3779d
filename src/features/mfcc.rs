//! Mel-frequency cepstral coefficient extraction.
//!
//! Framewise pipeline: Hann window → power spectrum (FFT) → mel filterbank
//! → log → DCT-II, keeping the first `n_mfcc` coefficients.

use anyhow::{anyhow, Result};
use rustfft::{num_complex::Complex, FftPlanner};

use crate::config::FeatureConfig;

#[derive(Debug, Clone)]
pub struct MfccConfig {
    pub sample_rate: u32,
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub n_mfcc: usize,
    pub f_min: f32,
    pub f_max: f32,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            n_fft: 512,
            hop_length: 160,
            n_mels: 40,
            n_mfcc: 13,
            f_min: 0.0,
            f_max: 8000.0,
        }
    }
}

impl From<&FeatureConfig> for MfccConfig {
    fn from(cfg: &FeatureConfig) -> Self {
        Self {
            sample_rate: cfg.sample_rate,
            n_fft: cfg.n_fft,
            hop_length: cfg.hop_length,
            n_mels: cfg.n_mels,
            n_mfcc: cfg.n_mfcc,
            f_min: 0.0,
            f_max: cfg.sample_rate as f32 / 2.0,
        }
    }
}

pub struct MfccExtractor {
    config: MfccConfig,
    fft_planner: FftPlanner<f32>,
    mel_filterbank: Vec<Vec<f32>>,
    window: Vec<f32>,
}

impl MfccExtractor {
    pub fn new(config: MfccConfig) -> Result<Self> {
        if config.n_mfcc > config.n_mels {
            return Err(anyhow!(
                "n_mfcc ({}) cannot exceed n_mels ({})",
                config.n_mfcc,
                config.n_mels
            ));
        }
        if config.f_max > config.sample_rate as f32 / 2.0 {
            return Err(anyhow!(
                "f_max ({}) exceeds the Nyquist frequency",
                config.f_max
            ));
        }

        // Hann window
        let n = config.n_fft;
        let window = (0..n)
            .map(|i| {
                let x = std::f32::consts::PI * i as f32 / n as f32;
                x.sin() * x.sin()
            })
            .collect();

        let mut extractor = Self {
            config,
            fft_planner: FftPlanner::new(),
            mel_filterbank: Vec::new(),
            window,
        };
        extractor.mel_filterbank = extractor.create_mel_filterbank();

        Ok(extractor)
    }

    pub fn config(&self) -> &MfccConfig {
        &self.config
    }

    /// Extract framewise MFCCs from mono audio.
    pub fn extract(&mut self, samples: &[f32]) -> Result<Vec<Vec<f32>>> {
        if samples.len() < self.config.n_fft {
            return Err(anyhow!(
                "Audio too short for feature extraction: {} samples, need {}",
                samples.len(),
                self.config.n_fft
            ));
        }

        let mut coefficients = Vec::new();
        let n_fft = self.config.n_fft;
        let hop = self.config.hop_length;

        let mut start = 0;
        while start + n_fft <= samples.len() {
            let frame = &samples[start..start + n_fft];
            coefficients.push(self.compute_frame(frame));
            start += hop;
        }

        Ok(coefficients)
    }

    /// Per-coefficient mean over all frames, the fixed-length clip
    /// representation used as classifier input.
    pub fn mean_mfcc(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        let frames = self.extract(samples)?;
        let n_frames = frames.len() as f32;
        let mut mean = vec![0.0f32; self.config.n_mfcc];

        for frame in &frames {
            for (m, &c) in mean.iter_mut().zip(frame.iter()) {
                *m += c;
            }
        }
        for m in mean.iter_mut() {
            *m /= n_frames;
        }

        Ok(mean)
    }

    fn compute_frame(&mut self, frame: &[f32]) -> Vec<f32> {
        let power = self.power_spectrum(frame);

        // Mel filterbank energies, floored before the log
        let log_mel: Vec<f32> = self
            .mel_filterbank
            .iter()
            .map(|filter| {
                let energy: f32 = filter
                    .iter()
                    .zip(power.iter())
                    .map(|(&weight, &p)| weight * p)
                    .sum();
                energy.max(1e-10).ln()
            })
            .collect();

        dct_ii(&log_mel, self.config.n_mfcc)
    }

    fn power_spectrum(&mut self, frame: &[f32]) -> Vec<f32> {
        let fft = self.fft_planner.plan_fft_forward(self.config.n_fft);

        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(self.window.iter())
            .map(|(&x, &w)| Complex::new(x * w, 0.0))
            .collect();

        fft.process(&mut buffer);

        // Positive frequencies only, magnitude squared
        buffer
            .iter()
            .take(self.config.n_fft / 2 + 1)
            .map(|c| c.norm_sqr())
            .collect()
    }

    /// Triangular mel filterbank over the positive-frequency FFT bins.
    fn create_mel_filterbank(&self) -> Vec<Vec<f32>> {
        let n_fft = self.config.n_fft;
        let n_mels = self.config.n_mels;
        let sample_rate = self.config.sample_rate as f32;

        let mel_min = hz_to_mel(self.config.f_min);
        let mel_max = hz_to_mel(self.config.f_max);

        // Evenly spaced mel points, converted back to FFT bin indices
        let bin_points: Vec<usize> = (0..=n_mels + 1)
            .map(|i| {
                let mel = mel_min + (mel_max - mel_min) * i as f32 / (n_mels + 1) as f32;
                let hz = mel_to_hz(mel);
                ((n_fft + 1) as f32 * hz / sample_rate).floor() as usize
            })
            .collect();

        let n_bins = n_fft / 2 + 1;
        let mut filterbank = vec![vec![0.0; n_bins]; n_mels];

        for m in 0..n_mels {
            let left = bin_points[m];
            let center = bin_points[m + 1];
            let right = bin_points[m + 2];

            for k in left..=right.min(n_bins - 1) {
                if k <= center {
                    if center > left {
                        filterbank[m][k] = (k - left) as f32 / (center - left) as f32;
                    }
                } else if right > center {
                    filterbank[m][k] = (right - k) as f32 / (right - center) as f32;
                }
            }
        }

        filterbank
    }
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Orthonormal DCT-II, keeping the first `n_out` coefficients.
fn dct_ii(input: &[f32], n_out: usize) -> Vec<f32> {
    let n = input.len() as f32;
    (0..n_out)
        .map(|k| {
            let sum: f32 = input
                .iter()
                .enumerate()
                .map(|(m, &v)| {
                    v * (std::f32::consts::PI * k as f32 * (m as f32 + 0.5) / n).cos()
                })
                .sum();
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            sum * scale
        })
        .collect()
}
