//! Core challenge logic: pattern generation, tap capture, validation and
//! the state machine that ties them together

mod machine;
mod pattern;
mod tap;
mod validator;

pub use machine::{Challenge, Phase, TRAILING_BUFFER_MS, VERIFY_DELAY_MS};
pub use pattern::{JitteredPatternGenerator, Pattern, PatternGenerator};
pub use tap::{intervals_ms, Tap};
pub use validator::{
    normalize, validate_rhythm, variance, LocalVerifier, RhythmVerifier,
    MIN_HUMAN_VARIANCE_MS2, SHAPE_TOLERANCE,
};
