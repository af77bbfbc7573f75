//! Beat timeline rendering
//!
//! Draws the target pattern as a row of beat markers positioned
//! proportionally to their cue offsets, with the user's taps on a second
//! row beneath. While the pattern is still playing, upcoming beat
//! positions are concealed so the timeline cannot be read ahead of the
//! audio.

use crate::challenge::{Challenge, Phase};
use crate::playback::CuePlayer;
use crate::ui::theme::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

/// Visual representation of the current pattern and tap sequence
pub struct BeatTimeline<'a> {
    challenge: &'a Challenge,
    player: &'a CuePlayer,
    colors: ThemeColors,
    flash: bool,
}

impl<'a> BeatTimeline<'a> {
    pub fn new(challenge: &'a Challenge, player: &'a CuePlayer, colors: ThemeColors) -> Self {
        Self {
            challenge,
            player,
            colors,
            flash: false,
        }
    }

    /// Light the cue indicator for the current frame
    pub fn flash(mut self, flash: bool) -> Self {
        self.flash = flash;
        self
    }

    fn offset_to_x(offset_ms: f64, total_ms: f64, x0: u16, width: u16) -> u16 {
        let frac = (offset_ms / total_ms).clamp(0.0, 1.0);
        x0 + (frac * (width.saturating_sub(1)) as f64).round() as u16
    }
}

impl<'a> Widget for BeatTimeline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 || area.height < 4 {
            buf.set_string(
                area.x,
                area.y,
                "Window too small",
                Style::default().fg(self.colors.dim),
            );
            return;
        }

        let Some(pattern) = self.challenge.pattern() else {
            buf.set_string(
                area.x + 1,
                area.y + 1,
                "Press p to play a rhythm",
                Style::default().fg(self.colors.dim),
            );
            return;
        };

        let x0 = area.x + 7;
        let width = area.width.saturating_sub(9);
        let total_ms = pattern.total_ms().max(1.0);
        let playing = self.challenge.phase() == Phase::Playing;

        // Cue row: played beats at their true offsets; upcoming beats are
        // spaced evenly while playing so their timing stays concealed.
        buf.set_string(
            area.x + 1,
            area.y,
            "cues ",
            Style::default().fg(self.colors.dim),
        );
        let offsets = pattern.cue_offsets_ms();
        for (i, &offset) in offsets.iter().enumerate() {
            let played = i < self.player.cues_played();
            let (symbol, color) = if played {
                ("\u{25cf}", self.colors.beat_on) // ●
            } else if playing {
                ("\u{00b7}", self.colors.beat_hidden) // ·
            } else {
                ("\u{25cb}", self.colors.beat_off) // ○
            };
            let x = if played || !playing {
                Self::offset_to_x(offset as f64, total_ms, x0, width)
            } else {
                x0 + (i as u16 * width) / offsets.len().max(1) as u16
            };
            buf.set_string(x, area.y, symbol, Style::default().fg(color));
        }

        // Tap row, scaled against the pattern's total duration
        buf.set_string(
            area.x + 1,
            area.y + 2,
            "taps ",
            Style::default().fg(self.colors.dim),
        );
        let taps = self.challenge.taps();
        if let Some(first) = taps.first() {
            for tap in taps {
                let rel_ms = tap.at_ms.saturating_sub(first.at_ms) as f64;
                let x = Self::offset_to_x(rel_ms, total_ms, x0, width);
                buf.set_string(
                    x,
                    area.y + 2,
                    "\u{25b2}", // ▲
                    Style::default().fg(self.colors.tap_mark),
                );
            }
        } else if self.challenge.phase() == Phase::AwaitingTaps {
            buf.set_string(
                x0,
                area.y + 2,
                "tap the rhythm back with Space",
                Style::default().fg(self.colors.dim),
            );
        }

        // Cue indicator in the left gutter
        if self.flash {
            buf.set_string(
                area.x + 1,
                area.y + 1,
                "\u{25c9}", // ◉
                Style::default()
                    .fg(self.colors.accent)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}
