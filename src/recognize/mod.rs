//! Free phoneme recognition of the child's actual speech, independent of
//! the transcript.

mod pocketsphinx;

pub use pocketsphinx::PocketSphinxRecognizer;

use anyhow::Result;
use std::path::Path;

/// A speech recognizer that decodes a prepared WAV into an ordered list of
/// recognized segment labels.
#[async_trait::async_trait]
pub trait PhonemeRecognizer: Send + Sync {
    async fn recognize(&self, wav_path: &Path) -> Result<Vec<String>>;
}
