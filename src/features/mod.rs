//! MFCC feature extraction for the phonological-error classifier dataset.

pub mod dataset;
pub mod mfcc;

pub use dataset::{extract_dataset, DatasetSummary, FeatureSet, ManifestEntry};
pub use mfcc::{MfccConfig, MfccExtractor};
