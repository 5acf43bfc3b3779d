//! Sample-rate conversion by linear interpolation.
//!
//! Uploads arrive at whatever rate the recording device used (44.1kHz is
//! common); analysis runs at a fixed rate, 16kHz by default.

/// Resample mono audio from `source_rate` to `target_rate`.
///
/// Returns the input unchanged when the rates already match.
pub fn resample(input: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || input.is_empty() {
        return input.to_vec();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (input.len() as f64 * ratio).round() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let source_index = i as f64 / ratio;
        let index_floor = source_index.floor() as usize;
        let index_ceil = (index_floor + 1).min(input.len() - 1);
        let fraction = (source_index - index_floor as f64) as f32;

        if index_floor >= input.len() {
            break;
        }

        let sample = if index_floor == index_ceil {
            input[index_floor]
        } else {
            let a = input[index_floor];
            let b = input[index_ceil];
            a + (b - a) * fraction
        };
        output.push(sample);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_rates_match() {
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&input, 16000, 16000), input);
    }

    #[test]
    fn downsampling_halves_length() {
        let input: Vec<f32> = (0..32000).map(|i| (i as f32 / 32000.0).sin()).collect();
        let output = resample(&input, 32000, 16000);
        let expected = input.len() / 2;
        assert!(
            (output.len() as i64 - expected as i64).abs() <= 1,
            "expected ~{} samples, got {}",
            expected,
            output.len()
        );
    }

    #[test]
    fn upsampling_interpolates_between_samples() {
        let input = vec![0.0, 1.0];
        let output = resample(&input, 8000, 16000);
        assert_eq!(output.len(), 4);
        // Midpoints lie between the original samples
        assert!(output[1] > 0.0 && output[1] < 1.0);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(resample(&[], 44100, 16000).is_empty());
    }
}
