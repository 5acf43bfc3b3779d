pub mod file;
pub mod preprocess;
pub mod resample;

pub use file::{write_wav_mono16, AudioFile};
pub use preprocess::{peak_normalize, preprocess, trim_silence};
pub use resample::resample;
