//! Terminal user interface components

mod app;
mod beat_visual;
pub mod theme;
mod widgets;

pub use app::{App, AppState, AppView};
pub use beat_visual::BeatTimeline;
pub use theme::ThemeColors;
pub use widgets::*;
