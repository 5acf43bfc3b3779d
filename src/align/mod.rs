//! Forced alignment: recover the reference phoneme sequence by aligning a
//! known transcript against the recording.

mod gentle;

pub use gentle::GentleClient;

use anyhow::Result;
use std::path::Path;

/// A service that aligns a transcript to audio and returns the phoneme
/// labels of the aligned pronunciation, in order.
#[async_trait::async_trait]
pub trait ForcedAligner: Send + Sync {
    async fn align(&self, transcript: &str, wav_path: &Path) -> Result<Vec<String>>;
}
