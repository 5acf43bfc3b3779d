pub mod align;
pub mod analyzer;
pub mod audio;
pub mod config;
pub mod features;
pub mod http;
pub mod recognize;
pub mod score;

pub use align::{ForcedAligner, GentleClient};
pub use analyzer::{AnalysisReport, PronunciationAnalyzer};
pub use audio::AudioFile;
pub use config::Config;
pub use features::{MfccConfig, MfccExtractor};
pub use http::{create_router, AppState};
pub use recognize::{PhonemeRecognizer, PocketSphinxRecognizer};
pub use score::{edit_distance, score, ErrorReport};
