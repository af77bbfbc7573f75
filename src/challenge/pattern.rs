//! Target rhythm generation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Base intervals a beat is sampled from, in ms
const BASE_INTERVALS_MS: [f64; 4] = [400.0, 600.0, 800.0, 1000.0];
/// Half-width of the uniform jitter applied around a base interval, in ms
const JITTER_MS: f64 = 100.0;
/// Inclusive bounds on the number of beats per pattern
const MIN_BEATS: usize = 3;
const MAX_BEATS: usize = 6;
/// Floor applied to any interval whose jittered value would be non-positive
const MIN_INTERVAL_MS: f64 = 50.0;

/// The target rhythm for one challenge instance: an ordered sequence of
/// inter-cue intervals in ms. Created once per playback and read-only
/// afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    intervals: Vec<f64>,
}

impl Pattern {
    pub fn new(intervals: Vec<f64>) -> Self {
        Self { intervals }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    /// Total playback duration, excluding any trailing buffer
    pub fn total_ms(&self) -> f64 {
        self.intervals.iter().sum()
    }

    /// Cumulative cue offsets from playback start, rounded to whole ms.
    /// One audible cue is emitted per offset.
    pub fn cue_offsets_ms(&self) -> Vec<u64> {
        let mut acc = 0.0;
        self.intervals
            .iter()
            .map(|interval| {
                acc += interval;
                acc.round() as u64
            })
            .collect()
    }
}

/// Source of target rhythms.
///
/// Kept behind a trait so pattern generation could later move to a
/// separate trusted process without touching the state machine.
pub trait PatternGenerator {
    fn generate(&mut self) -> Pattern;
}

/// Samples 3-6 beats from the base intervals with bounded uniform jitter.
pub struct JitteredPatternGenerator {
    rng: StdRng,
}

impl JitteredPatternGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for JitteredPatternGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternGenerator for JitteredPatternGenerator {
    fn generate(&mut self) -> Pattern {
        let beats = self.rng.gen_range(MIN_BEATS..=MAX_BEATS);
        let intervals = (0..beats)
            .map(|_| {
                let base = BASE_INTERVALS_MS[self.rng.gen_range(0..BASE_INTERVALS_MS.len())];
                let jitter = self.rng.gen_range(-JITTER_MS..JITTER_MS);
                clamp_interval(base + jitter)
            })
            .collect();
        Pattern::new(intervals)
    }
}

/// Non-positive draws are clamped to a small floor instead of re-rolling.
fn clamp_interval(value_ms: f64) -> f64 {
    if value_ms <= 0.0 {
        MIN_INTERVAL_MS
    } else {
        value_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_offsets_are_cumulative() {
        let pattern = Pattern::new(vec![400.0, 600.0, 400.0, 600.0]);
        assert_eq!(pattern.cue_offsets_ms(), vec![400, 1000, 1400, 2000]);
        assert_eq!(pattern.total_ms(), 2000.0);
    }

    #[test]
    fn generated_length_stays_in_bounds() {
        let mut gen = JitteredPatternGenerator::with_seed(7);
        for _ in 0..200 {
            let pattern = gen.generate();
            assert!(pattern.len() >= MIN_BEATS && pattern.len() <= MAX_BEATS);
        }
    }

    #[test]
    fn generated_intervals_are_strictly_positive() {
        let mut gen = JitteredPatternGenerator::with_seed(42);
        for _ in 0..200 {
            let pattern = gen.generate();
            assert!(pattern.intervals().iter().all(|&i| i > 0.0));
        }
    }

    #[test]
    fn generated_intervals_stay_near_bases() {
        // Every beat is base +/- jitter, so the smallest possible value
        // is 400 - 100 and the largest 1000 + 100.
        let mut gen = JitteredPatternGenerator::with_seed(99);
        for _ in 0..100 {
            let pattern = gen.generate();
            for &interval in pattern.intervals() {
                assert!((300.0..1100.0).contains(&interval));
            }
        }
    }

    #[test]
    fn same_seed_reproduces_pattern() {
        let a = JitteredPatternGenerator::with_seed(5).generate();
        let b = JitteredPatternGenerator::with_seed(5).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn clamp_floors_non_positive_values() {
        assert_eq!(clamp_interval(-20.0), MIN_INTERVAL_MS);
        assert_eq!(clamp_interval(0.0), MIN_INTERVAL_MS);
        assert_eq!(clamp_interval(350.0), 350.0);
    }
}
