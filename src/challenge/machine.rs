//! Challenge state machine
//!
//! Owns the live challenge: the target pattern, the captured taps and the
//! current phase. All mutation funnels through the transition operations,
//! so the challenge is a single-writer resource. Playback completion and
//! the verdict are deferred transitions pumped by `tick`; each one carries
//! the generation it was scheduled against, and a reset bumps the
//! generation so a stale completion can never resolve a challenge that
//! has since moved on.

use super::pattern::{JitteredPatternGenerator, Pattern, PatternGenerator};
use super::tap::Tap;
use super::validator::{LocalVerifier, RhythmVerifier};
use log::{debug, info};

/// Quiet period after the final cue before taps are accepted, in ms
pub const TRAILING_BUFFER_MS: u64 = 1_000;
/// Fixed delay before a verdict is produced, in ms
pub const VERIFY_DELAY_MS: u64 = 1_000;

/// Phase of the live challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    AwaitingTaps,
    Verifying,
    Passed,
    Failed,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Playing => "Playing",
            Self::AwaitingTaps => "Awaiting taps",
            Self::Verifying => "Verifying",
            Self::Passed => "Passed",
            Self::Failed => "Failed",
        }
    }

    /// Whether this phase ends an attempt
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

/// What a deferred transition does when it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredKind {
    PlaybackDone,
    VerdictDue,
}

/// A transition scheduled for a future tick, tied to the challenge
/// generation it was created under
#[derive(Debug, Clone, Copy)]
struct Deferred {
    kind: DeferredKind,
    due_at_ms: u64,
    generation: u64,
}

/// The aggregate owning one attempt's lifecycle
pub struct Challenge {
    phase: Phase,
    pattern: Option<Pattern>,
    taps: Vec<Tap>,
    verdict: Option<bool>,
    generation: u64,
    pending: Option<Deferred>,
    generator: Box<dyn PatternGenerator>,
    verifier: Box<dyn RhythmVerifier>,
    trailing_buffer_ms: u64,
    verify_delay_ms: u64,
}

impl Challenge {
    pub fn new() -> Self {
        Self::with_parts(
            Box::new(JitteredPatternGenerator::new()),
            Box::new(LocalVerifier),
        )
    }

    /// Build a challenge around an explicit generator and verifier.
    /// Tests use this to inject a scripted pattern source.
    pub fn with_parts(
        generator: Box<dyn PatternGenerator>,
        verifier: Box<dyn RhythmVerifier>,
    ) -> Self {
        Self {
            phase: Phase::Idle,
            pattern: None,
            taps: Vec::new(),
            verdict: None,
            generation: 0,
            pending: None,
            generator,
            verifier,
            trailing_buffer_ms: TRAILING_BUFFER_MS,
            verify_delay_ms: VERIFY_DELAY_MS,
        }
    }

    /// Override the presentational delays (playback tail, verify latency)
    pub fn with_timings(mut self, trailing_buffer_ms: u64, verify_delay_ms: u64) -> Self {
        self.trailing_buffer_ms = trailing_buffer_ms;
        self.verify_delay_ms = verify_delay_ms;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn taps(&self) -> &[Tap] {
        &self.taps
    }

    /// Outcome of the most recent verification, if one has resolved
    pub fn last_verdict(&self) -> Option<bool> {
        self.verdict
    }

    /// Start a new attempt: generate a fresh pattern, discard the previous
    /// attempt in full and hand back the cue offsets for the playback
    /// adapter. Returns `None` (a no-op) unless the challenge is idle or
    /// resolved.
    pub fn start_playback(&mut self, now_ms: u64) -> Option<Vec<u64>> {
        if !matches!(self.phase, Phase::Idle) && !self.phase.is_resolved() {
            return None;
        }

        let pattern = self.generator.generate();
        let offsets = pattern.cue_offsets_ms();
        let total_ms = pattern.total_ms().round() as u64;

        self.generation += 1;
        self.taps.clear();
        self.verdict = None;
        self.pattern = Some(pattern);
        self.pending = Some(Deferred {
            kind: DeferredKind::PlaybackDone,
            due_at_ms: now_ms + total_ms + self.trailing_buffer_ms,
            generation: self.generation,
        });
        self.set_phase(Phase::Playing);

        Some(offsets)
    }

    /// Record a tap at `now_ms`. Taps arriving outside the awaiting-taps
    /// phase are silently ignored. Returns whether the tap was accepted,
    /// so the shell can emit an acknowledgement cue.
    pub fn record_tap(&mut self, now_ms: u64) -> bool {
        if self.phase != Phase::AwaitingTaps {
            return false;
        }

        let tap = match self.taps.last() {
            Some(prev) => Tap::after(now_ms, prev),
            None => Tap::first(now_ms),
        };
        debug!("tap recorded at {}ms ({} total)", now_ms, self.taps.len() + 1);
        self.taps.push(tap);
        true
    }

    /// Request verification of the captured taps. Legal only while
    /// awaiting taps with at least one tap recorded; otherwise a no-op.
    /// The verdict resolves after the verify delay, via `tick`.
    pub fn verify(&mut self, now_ms: u64) -> bool {
        if self.phase != Phase::AwaitingTaps || self.taps.is_empty() {
            return false;
        }

        self.pending = Some(Deferred {
            kind: DeferredKind::VerdictDue,
            due_at_ms: now_ms + self.verify_delay_ms,
            generation: self.generation,
        });
        self.set_phase(Phase::Verifying);
        true
    }

    /// Return to idle from any phase, clearing the pattern, taps and
    /// verdict. Bumps the generation so any outstanding deferred
    /// transition is discarded when it fires.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pattern = None;
        self.taps.clear();
        self.verdict = None;
        self.set_phase(Phase::Idle);
    }

    /// Pump deferred transitions. Called once per poll-loop iteration;
    /// applies a due transition whose generation still matches the live
    /// challenge, and discards stale ones.
    pub fn tick(&mut self, now_ms: u64) {
        let Some(deferred) = self.pending else {
            return;
        };

        if deferred.generation != self.generation {
            debug!("discarding stale {:?} completion", deferred.kind);
            self.pending = None;
            return;
        }

        if now_ms < deferred.due_at_ms {
            return;
        }

        self.pending = None;
        match deferred.kind {
            DeferredKind::PlaybackDone => {
                if self.phase == Phase::Playing {
                    self.set_phase(Phase::AwaitingTaps);
                }
            }
            DeferredKind::VerdictDue => {
                if self.phase == Phase::Verifying {
                    let passed = match self.pattern.as_ref() {
                        Some(pattern) => self.verifier.verify(&self.taps, pattern),
                        None => false,
                    };
                    info!(
                        "verdict after {} taps: {}",
                        self.taps.len(),
                        if passed { "passed" } else { "failed" }
                    );
                    self.verdict = Some(passed);
                    self.set_phase(if passed { Phase::Passed } else { Phase::Failed });
                }
            }
        }
    }

    fn set_phase(&mut self, next: Phase) {
        if self.phase != next {
            debug!("phase {} -> {}", self.phase.name(), next.name());
            self.phase = next;
        }
    }
}

impl Default for Challenge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGenerator(Vec<f64>);

    impl PatternGenerator for FixedGenerator {
        fn generate(&mut self) -> Pattern {
            Pattern::new(self.0.clone())
        }
    }

    fn machine(intervals: &[f64]) -> Challenge {
        Challenge::with_parts(
            Box::new(FixedGenerator(intervals.to_vec())),
            Box::new(LocalVerifier),
        )
    }

    #[test]
    fn starts_idle_and_empty() {
        let challenge = machine(&[400.0, 600.0, 400.0]);
        assert_eq!(challenge.phase(), Phase::Idle);
        assert!(challenge.taps().is_empty());
        assert!(challenge.pattern().is_none());
        assert_eq!(challenge.last_verdict(), None);
    }

    #[test]
    fn start_playback_returns_cue_offsets() {
        let mut challenge = machine(&[400.0, 600.0, 400.0, 600.0]);
        let offsets = challenge.start_playback(0).unwrap();
        assert_eq!(offsets, vec![400, 1000, 1400, 2000]);
        assert_eq!(challenge.phase(), Phase::Playing);
        assert_eq!(challenge.pattern().unwrap().len(), 4);
    }

    #[test]
    fn playback_completes_after_trailing_buffer() {
        let mut challenge = machine(&[400.0, 600.0]);
        challenge.start_playback(0);

        challenge.tick(1_999);
        assert_eq!(challenge.phase(), Phase::Playing);

        // total 1000ms + 1000ms trailing buffer
        challenge.tick(2_000);
        assert_eq!(challenge.phase(), Phase::AwaitingTaps);
    }

    #[test]
    fn tap_outside_awaiting_phase_is_a_no_op() {
        let mut challenge = machine(&[400.0, 600.0, 400.0]);
        assert!(!challenge.record_tap(100));
        assert!(challenge.taps().is_empty());
        assert_eq!(challenge.phase(), Phase::Idle);

        challenge.start_playback(0);
        assert!(!challenge.record_tap(200));
        assert!(challenge.taps().is_empty());
    }

    #[test]
    fn verify_requires_at_least_one_tap() {
        let mut challenge = machine(&[400.0, 600.0]);
        challenge.start_playback(0);
        challenge.tick(2_000);
        assert_eq!(challenge.phase(), Phase::AwaitingTaps);

        assert!(!challenge.verify(2_100));
        assert_eq!(challenge.phase(), Phase::AwaitingTaps);
    }

    #[test]
    fn start_playback_while_playing_is_a_no_op() {
        let mut challenge = machine(&[400.0, 600.0]);
        assert!(challenge.start_playback(0).is_some());
        assert!(challenge.start_playback(100).is_none());
    }

    #[test]
    fn custom_timings_shift_the_deadlines() {
        let mut challenge = machine(&[400.0, 600.0]).with_timings(500, 200);
        challenge.start_playback(0);

        challenge.tick(1_499);
        assert_eq!(challenge.phase(), Phase::Playing);
        challenge.tick(1_500);
        assert_eq!(challenge.phase(), Phase::AwaitingTaps);
    }

    #[test]
    fn reset_bumps_generation_and_discards_stale_completion() {
        let mut challenge = machine(&[400.0, 600.0]);
        challenge.start_playback(0);
        challenge.reset();
        assert_eq!(challenge.phase(), Phase::Idle);

        // The playback completion scheduled at t=2000 must not fire.
        challenge.tick(5_000);
        assert_eq!(challenge.phase(), Phase::Idle);
        assert!(challenge.pattern().is_none());
    }

    #[test]
    fn taps_record_derived_intervals() {
        let mut challenge = machine(&[400.0, 600.0]);
        challenge.start_playback(0);
        challenge.tick(2_000);

        challenge.record_tap(2_100);
        challenge.record_tap(2_500);
        challenge.record_tap(3_100);

        let taps = challenge.taps();
        assert_eq!(taps[0].interval_ms, None);
        assert_eq!(taps[1].interval_ms, Some(400));
        assert_eq!(taps[2].interval_ms, Some(600));
    }
}
