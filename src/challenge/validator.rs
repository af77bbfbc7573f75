//! Rhythm validation
//!
//! Pure comparison of captured taps against the target pattern. Every
//! degenerate input maps to a failed verdict; this module never errors.

use super::pattern::Pattern;
use super::tap::{intervals_ms, Tap};

/// Maximum allowed per-beat deviation after normalization
pub const SHAPE_TOLERANCE: f64 = 0.2;
/// Raw-interval variance below this is treated as mechanical input, in ms^2
pub const MIN_HUMAN_VARIANCE_MS2: f64 = 0.001;

/// Verdict producer for a captured tap sequence.
///
/// The local implementation runs in the same process that issued the
/// pattern; the trait exists so the verdict could instead come from a
/// separate trusted process without changing the algorithms.
pub trait RhythmVerifier {
    fn verify(&self, taps: &[Tap], pattern: &Pattern) -> bool;
}

/// In-process verifier
pub struct LocalVerifier;

impl RhythmVerifier for LocalVerifier {
    fn verify(&self, taps: &[Tap], pattern: &Pattern) -> bool {
        validate_rhythm(taps, pattern)
    }
}

/// Compare a tap sequence against the target pattern.
///
/// Both interval sequences are normalized by their own sum so only the
/// shape of the rhythm is compared, not its tempo. Each compared beat
/// must land within [`SHAPE_TOLERANCE`] of the target; intervals beyond
/// the pattern length are ignored. Raw intervals with near-zero variance
/// fail regardless of shape, since sub-millisecond repeatability is not
/// human.
pub fn validate_rhythm(taps: &[Tap], pattern: &Pattern) -> bool {
    if taps.len() < pattern.len() {
        return false;
    }

    let user_intervals = intervals_ms(taps);

    let (Some(user_norm), Some(pattern_norm)) =
        (normalize(&user_intervals), normalize(pattern.intervals()))
    else {
        return false;
    };

    let compared = user_norm.len().min(pattern_norm.len());
    let shape_ok =
        (0..compared).all(|i| (user_norm[i] - pattern_norm[i]).abs() <= SHAPE_TOLERANCE);

    let too_perfect = variance(&user_intervals) < MIN_HUMAN_VARIANCE_MS2;

    shape_ok && !too_perfect
}

/// Divide each interval by the sequence sum, yielding a tempo-independent
/// shape profile that sums to 1. `None` when the sum is zero, negative or
/// not finite.
pub fn normalize(intervals: &[f64]) -> Option<Vec<f64>> {
    let sum: f64 = intervals.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return None;
    }
    Some(intervals.iter().map(|i| i / sum).collect())
}

/// Population variance: mean squared deviation from the mean
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taps_at(times: &[u64]) -> Vec<Tap> {
        let mut taps: Vec<Tap> = Vec::new();
        for &at in times {
            let tap = match taps.last() {
                Some(prev) => Tap::after(at, prev),
                None => Tap::first(at),
            };
            taps.push(tap);
        }
        taps
    }

    #[test]
    fn normalized_sequence_sums_to_one() {
        let norm = normalize(&[400.0, 600.0, 800.0, 1000.0]).unwrap();
        let sum: f64 = norm.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_rejects_zero_sum() {
        assert!(normalize(&[0.0, 0.0, 0.0]).is_none());
        assert!(normalize(&[]).is_none());
    }

    #[test]
    fn insufficient_taps_fail() {
        let pattern = Pattern::new(vec![400.0, 600.0, 400.0, 600.0]);
        let taps = taps_at(&[0, 400, 1000]);
        assert!(!validate_rhythm(&taps, &pattern));
    }

    #[test]
    fn exact_match_passes() {
        let pattern = Pattern::new(vec![400.0, 600.0, 400.0, 600.0]);
        let taps = taps_at(&[0, 400, 1000, 1400, 2000]);
        assert!(validate_rhythm(&taps, &pattern));
    }

    #[test]
    fn shift_inside_tolerance_passes() {
        // Pattern normalizes to [0.2, 0.3, 0.2, 0.3]; these taps produce
        // [0.39, 0.11, 0.2, 0.3], a worst-case deviation of 0.19.
        let pattern = Pattern::new(vec![400.0, 600.0, 400.0, 600.0]);
        let taps = taps_at(&[0, 780, 1000, 1400, 2000]);
        assert!(validate_rhythm(&taps, &pattern));
    }

    #[test]
    fn shift_beyond_tolerance_fails() {
        // Same construction with a worst-case deviation of 0.21.
        let pattern = Pattern::new(vec![400.0, 600.0, 400.0, 600.0]);
        let taps = taps_at(&[0, 820, 1000, 1400, 2000]);
        assert!(!validate_rhythm(&taps, &pattern));
    }

    #[test]
    fn mechanical_precision_fails_despite_matching_shape() {
        let pattern = Pattern::new(vec![500.0, 500.0, 500.0, 500.0]);
        let taps = taps_at(&[0, 500, 1000, 1500, 2000]);
        assert!(!validate_rhythm(&taps, &pattern));
    }

    #[test]
    fn extra_trailing_taps_are_ignored() {
        let pattern = Pattern::new(vec![400.0, 600.0, 400.0, 600.0]);
        // Matching reproduction followed by two stray taps well after the
        // compared window.
        let taps = taps_at(&[0, 400, 1000, 1400, 2000, 2900, 4000]);
        assert!(validate_rhythm(&taps, &pattern));
    }

    #[test]
    fn simultaneous_taps_fail_instead_of_propagating_nan() {
        let pattern = Pattern::new(vec![400.0, 600.0, 400.0]);
        let taps = taps_at(&[100, 100, 100]);
        assert!(!validate_rhythm(&taps, &pattern));
    }

    #[test]
    fn variance_of_identical_values_is_zero() {
        assert_eq!(variance(&[500.0, 500.0, 500.0]), 0.0);
    }

    #[test]
    fn variance_of_spread_values() {
        // Mean 500, deviations +/-100 -> variance 10000.
        assert_eq!(variance(&[400.0, 600.0, 400.0, 600.0]), 10_000.0);
    }
}
