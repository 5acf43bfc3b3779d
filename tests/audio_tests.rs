// Integration tests for audio decoding and preprocessing.
//
// Fixtures are synthesized with hound so the tests need no checked-in
// binary files.

use anyhow::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use phonolab::audio::{preprocess, write_wav_mono16, AudioFile};
use std::path::Path;

/// Write a 16-bit PCM WAV: `silence` seconds of silence, then `voiced`
/// seconds of a 440Hz tone at the given amplitude, then silence again.
fn write_fixture(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    silence_secs: f32,
    voiced_secs: f32,
    amplitude: f32,
) -> Result<()> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;

    let silence_frames = (silence_secs * sample_rate as f32) as usize;
    let voiced_frames = (voiced_secs * sample_rate as f32) as usize;

    for _ in 0..silence_frames * channels as usize {
        writer.write_sample(0i16)?;
    }
    for i in 0..voiced_frames {
        let t = i as f32 / sample_rate as f32;
        let value = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * amplitude;
        let sample = (value * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample)?;
        }
    }
    for _ in 0..silence_frames * channels as usize {
        writer.write_sample(0i16)?;
    }

    writer.finalize()?;
    Ok(())
}

#[test]
fn test_audio_file_open_reads_wav_metadata() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tone.wav");
    write_fixture(&path, 16000, 1, 0.25, 1.0, 0.5)?;

    let audio = AudioFile::open(&path)?;

    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert!((audio.duration_seconds - 1.5).abs() < 0.05);
    assert!(!audio.samples.is_empty());
    assert!(audio.path.contains("tone.wav"));

    Ok(())
}

#[test]
fn test_audio_file_open_nonexistent_fails() {
    let result = AudioFile::open("/nonexistent/path/to/audio.wav");
    assert!(result.is_err(), "Opening nonexistent file should fail");
}

#[test]
fn test_stereo_downmix_halves_sample_count() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stereo.wav");
    write_fixture(&path, 16000, 2, 0.0, 0.5, 0.5)?;

    let audio = AudioFile::open(&path)?;
    assert_eq!(audio.channels, 2);

    let mono = audio.to_mono();
    assert_eq!(mono.len(), audio.samples.len() / 2);

    Ok(())
}

#[test]
fn test_preprocess_normalizes_and_trims() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("quiet.wav");
    // Quiet tone (peak 0.2) padded with a second of silence on both sides
    write_fixture(&path, 16000, 1, 1.0, 1.0, 0.2)?;

    let samples = preprocess(&path, 16000, 30.0)?;

    // Normalization brings the peak to 1.0
    let peak = samples.iter().fold(0.0f32, |max, s| max.max(s.abs()));
    assert!((peak - 1.0).abs() < 0.01, "peak was {}", peak);

    // Trimming drops most of the 2 seconds of silent padding
    assert!(
        samples.len() < 2 * 16000,
        "expected silence trimmed, got {} samples",
        samples.len()
    );
    // But keeps the full second of tone
    assert!(samples.len() >= 16000 - 4096);

    Ok(())
}

#[test]
fn test_preprocess_survives_all_silent_input() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("silent.wav");
    write_fixture(&path, 16000, 1, 1.0, 0.0, 0.0)?;

    // All-silent input must not panic; it trims to nothing
    let samples = preprocess(&path, 16000, 30.0)?;
    assert!(samples.is_empty());

    Ok(())
}

#[test]
fn test_preprocess_resamples_to_target_rate() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("hi-rate.wav");
    write_fixture(&path, 44100, 1, 0.0, 1.0, 0.8)?;

    let samples = preprocess(&path, 16000, 30.0)?;

    // One second of 44.1kHz audio becomes ~one second at 16kHz
    assert!(
        (samples.len() as i64 - 16000).abs() < 1024,
        "expected ~16000 samples, got {}",
        samples.len()
    );

    Ok(())
}

#[test]
fn test_write_wav_round_trips_through_decoder() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("written.wav");

    let samples: Vec<f32> = (0..8000)
        .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 16000.0).sin() * 0.7)
        .collect();
    write_wav_mono16(&path, &samples, 16000)?;

    let audio = AudioFile::open(&path)?;
    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.samples.len(), samples.len());

    // Amplitudes survive the i16 round trip within quantization error
    for (original, decoded) in samples.iter().zip(audio.samples.iter()) {
        assert!((original - decoded).abs() < 1e-3);
    }

    Ok(())
}
