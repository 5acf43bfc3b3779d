use crate::analyzer::PronunciationAnalyzer;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The analysis pipeline; immutable across requests
    pub analyzer: Arc<PronunciationAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: Arc<PronunciationAnalyzer>) -> Self {
        Self { analyzer }
    }
}
