use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use super::PhonemeRecognizer;

/// Recognizer backed by the PocketSphinx command-line decoder.
///
/// The acoustic model directory and pronunciation dictionary are validated
/// at construction; a missing model is a fatal setup error, not something
/// to degrade around at request time.
pub struct PocketSphinxRecognizer {
    model_dir: PathBuf,
    dict_path: PathBuf,
    decoder_bin: String,
}

impl PocketSphinxRecognizer {
    pub fn new(
        model_dir: impl Into<PathBuf>,
        dict_path: impl Into<PathBuf>,
        decoder_bin: impl Into<String>,
    ) -> Result<Self> {
        let model_dir = model_dir.into();
        let dict_path = dict_path.into();

        if !model_dir.is_dir() || !dict_path.is_file() {
            anyhow::bail!(
                "Missing acoustic model or dictionary: model_dir={}, dict={}",
                model_dir.display(),
                dict_path.display()
            );
        }

        info!("Recognizer ready: model {}", model_dir.display());

        Ok(Self {
            model_dir,
            dict_path,
            decoder_bin: decoder_bin.into(),
        })
    }
}

/// Parse the decoder's timed output into segment labels.
///
/// With `-time yes` the decoder prints one segment per line as
/// `label start end [score]`; lines that do not carry numeric start/end
/// times (the bare hypothesis line, log noise) are skipped.
fn parse_segments(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let label = fields.next()?;
            let start = fields.next()?.parse::<f64>().ok()?;
            let end = fields.next()?.parse::<f64>().ok()?;
            if end < start {
                return None;
            }
            Some(label.to_string())
        })
        .collect()
}

#[async_trait::async_trait]
impl PhonemeRecognizer for PocketSphinxRecognizer {
    async fn recognize(&self, wav_path: &Path) -> Result<Vec<String>> {
        debug!("Decoding {}", wav_path.display());

        let output = Command::new(&self.decoder_bin)
            .arg("-hmm")
            .arg(&self.model_dir)
            .arg("-dict")
            .arg(&self.dict_path)
            .arg("-infile")
            .arg(wav_path)
            .arg("-time")
            .arg("yes")
            .stderr(Stdio::null()) // the decoder is extremely chatty
            .stdout(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to run decoder '{}'", self.decoder_bin))?;

        if !output.status.success() {
            anyhow::bail!("Decoder exited with status {}", output.status);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let segments = parse_segments(&stdout);
        debug!("Recognized {} segments", segments.len());

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timed_segment_lines() {
        let stdout = "\
the monkey swings
<s> 0.000 0.120 1.000
the 0.120 0.300 0.982
monkey 0.300 0.810 0.871
swings 0.810 1.400 0.665
</s> 1.400 1.500 1.000
";
        let segments = parse_segments(stdout);
        assert_eq!(segments, vec!["<s>", "the", "monkey", "swings", "</s>"]);
    }

    #[test]
    fn skips_untimed_and_malformed_lines() {
        let stdout = "INFO: decoder initialized\nhello 0.0\nhello 0.5 0.2\n";
        assert!(parse_segments(stdout).is_empty());
    }

    #[test]
    fn empty_output_yields_no_segments() {
        assert!(parse_segments("").is_empty());
    }

    #[test]
    fn missing_model_is_fatal() {
        let result = PocketSphinxRecognizer::new(
            "/nonexistent/model",
            "/nonexistent/model/cmudict.dict",
            "pocketsphinx_continuous",
        );
        assert!(result.is_err());
    }
}
