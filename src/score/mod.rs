//! Sequence alignment and error scoring for phoneme sequences.

use serde::{Deserialize, Serialize};

/// Counts and verdict for one reference/hypothesis comparison.
///
/// Insertion and deletion counts are approximated from the length
/// difference alone; substitutions absorb the remaining edit distance.
/// This is deliberately not a full alignment-with-backtrace classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub substitutions: usize,
    pub deletions: usize,
    pub insertions: usize,
    pub error_rate: f64,
    pub is_correct: bool,
}

/// Levenshtein distance between two phoneme sequences, unit cost for
/// insert, delete and substitute. Two-row dynamic program.
pub fn edit_distance<S: AsRef<str>>(reference: &[S], hypothesis: &[S]) -> usize {
    let width = hypothesis.len();
    let mut prev: Vec<usize> = (0..=width).collect();
    let mut curr: Vec<usize> = vec![0; width + 1];

    for (i, r) in reference.iter().enumerate() {
        curr[0] = i + 1;
        for (j, h) in hypothesis.iter().enumerate() {
            let substitution = prev[j] + usize::from(r.as_ref() != h.as_ref());
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[width]
}

/// Score a hypothesis phoneme sequence against the reference.
///
/// The error rate is the edit distance normalized by the reference length
/// (floor 1, so an empty reference never divides by zero); an attempt is
/// correct when the rate is at or below `threshold`.
pub fn score<S: AsRef<str>>(reference: &[S], hypothesis: &[S], threshold: f64) -> ErrorReport {
    let distance = edit_distance(reference, hypothesis);
    let insertions = hypothesis.len().saturating_sub(reference.len());
    let deletions = reference.len().saturating_sub(hypothesis.len());
    let substitutions = distance.saturating_sub(insertions + deletions);
    let error_rate = distance as f64 / reference.len().max(1) as f64;

    ErrorReport {
        substitutions,
        deletions,
        insertions,
        error_rate,
        is_correct: error_rate <= threshold,
    }
}
