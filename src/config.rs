use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub gentle: GentleConfig,
    pub recognizer: RecognizerConfig,
    pub analysis: AnalysisConfig,
    pub features: FeatureConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "phonolab".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GentleConfig {
    /// Base URL of the Gentle forced-alignment server
    pub base_url: String,
    /// Request timeout in seconds (forced alignment can be slow)
    pub timeout_secs: u64,
}

impl Default for GentleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8765".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Acoustic model directory (e.g. the unpacked en-us model)
    pub model_dir: PathBuf,
    /// Pronunciation dictionary path
    pub dict_path: PathBuf,
    /// Decoder executable invoked per request
    pub decoder_bin: String,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models/en-us"),
            dict_path: PathBuf::from("models/en-us/cmudict-en-us.dict"),
            decoder_bin: "pocketsphinx_continuous".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sample rate all audio is converted to before analysis
    pub sample_rate: u32,
    /// Frames this many dB below the loudest frame are trimmed as silence
    pub trim_top_db: f32,
    /// Phoneme error rate at or below this counts as a correct attempt
    pub error_rate_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            trim_top_db: 30.0,
            error_rate_threshold: 0.10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub sample_rate: u32,
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub n_mfcc: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            n_fft: 512,
            hop_length: 160,
            n_mels: 40,
            n_mfcc: 13,
        }
    }
}

impl Config {
    /// Load configuration from a file, falling back to defaults for
    /// anything the file does not set (or if the file is absent).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_analysis_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.analysis.sample_rate, 16000);
        assert_eq!(cfg.analysis.trim_top_db, 30.0);
        assert_eq!(cfg.analysis.error_rate_threshold, 0.10);
        assert_eq!(cfg.features.n_mfcc, 13);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let cfg = Config::load("config/does-not-exist").unwrap();
        assert_eq!(cfg.service.http.port, 8000);
        assert_eq!(cfg.gentle.base_url, "http://localhost:8765");
    }
}
