//! Rhythm Captcha - rhythm-based human verification for the terminal
//!
//! Plays back a randomly generated rhythm and asks the user to tap it
//! back in time. The reproduction is compared against the target shape
//! with tolerance, and mechanically perfect timing is rejected.

pub mod challenge;
pub mod config;
pub mod playback;
pub mod ui;
pub mod utils;

pub use config::Config;
