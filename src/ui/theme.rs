//! Theme color definitions for the UI
//!
//! Provides dark and light color palettes that can be switched at runtime.

use crate::config::Theme;
use ratatui::style::Color;

/// Complete color palette for the UI
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (headings, active elements)
    pub accent: Color,
    /// Success / passed verdict
    pub green: Color,
    /// Warning status
    pub yellow: Color,
    /// Error / failed verdict
    pub red: Color,
    /// Beat marker not yet played
    pub beat_off: Color,
    /// Beat marker that has fired
    pub beat_on: Color,
    /// Upcoming beat while the position is still concealed
    pub beat_hidden: Color,
    /// User tap marker
    pub tap_mark: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            fg: Color::Rgb(200, 200, 210),
            dim: Color::Rgb(90, 90, 110),
            accent: Color::Rgb(80, 200, 220),
            green: Color::Rgb(80, 200, 120),
            yellow: Color::Rgb(240, 180, 80),
            red: Color::Rgb(240, 90, 100),
            beat_off: Color::Rgb(70, 70, 90),
            beat_on: Color::Rgb(80, 200, 120),
            beat_hidden: Color::Rgb(45, 45, 58),
            tap_mark: Color::Rgb(80, 200, 220),
        }
    }

    /// High contrast for bright terminals
    pub fn light() -> Self {
        Self {
            fg: Color::Rgb(30, 30, 40),
            dim: Color::Rgb(130, 130, 150),
            accent: Color::Rgb(0, 130, 160),
            green: Color::Rgb(30, 150, 70),
            yellow: Color::Rgb(180, 120, 0),
            red: Color::Rgb(200, 50, 60),
            beat_off: Color::Rgb(190, 190, 205),
            beat_on: Color::Rgb(30, 150, 70),
            beat_hidden: Color::Rgb(215, 215, 226),
            tap_mark: Color::Rgb(0, 130, 160),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_theme_creates_palette() {
        let colors = ThemeColors::dark();
        assert_eq!(colors.green, Color::Rgb(80, 200, 120));
        assert_eq!(colors.beat_on, colors.green);
    }

    #[test]
    fn from_theme_selects_correct_palette() {
        let dark = ThemeColors::from_theme(Theme::Dark);
        let light = ThemeColors::from_theme(Theme::Light);
        assert_ne!(dark.fg, light.fg);
    }
}
