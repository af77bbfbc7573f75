//! Custom TUI widgets

use crate::ui::theme::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Severity of a readout line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Ok,
    Warning,
    Error,
    Info,
}

/// One labelled line in a readout panel
#[derive(Debug, Clone)]
pub struct PanelEntry {
    pub label: String,
    pub value: String,
    pub status: EntryStatus,
}

impl PanelEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>, status: EntryStatus) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            status,
        }
    }

    pub fn ok(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, EntryStatus::Ok)
    }

    pub fn warning(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, EntryStatus::Warning)
    }

    pub fn error(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, EntryStatus::Error)
    }

    pub fn info(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, EntryStatus::Info)
    }
}

/// Widget for displaying the current view's readout lines
pub struct ReadoutPanel<'a> {
    entries: &'a [PanelEntry],
    title: &'a str,
    colors: ThemeColors,
}

impl<'a> ReadoutPanel<'a> {
    pub fn new(entries: &'a [PanelEntry], title: &'a str, colors: ThemeColors) -> Self {
        Self {
            entries,
            title,
            colors,
        }
    }

    fn status_color(&self, status: EntryStatus) -> Color {
        match status {
            EntryStatus::Ok => self.colors.green,
            EntryStatus::Warning => self.colors.yellow,
            EntryStatus::Error => self.colors.red,
            EntryStatus::Info => self.colors.accent,
        }
    }

    fn status_symbol(status: EntryStatus) -> &'static str {
        match status {
            EntryStatus::Ok => "[OK]",
            EntryStatus::Warning => "[!!]",
            EntryStatus::Error => "[XX]",
            EntryStatus::Info => "[--]",
        }
    }
}

impl<'a> Widget for ReadoutPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.fg));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut y = inner.y;
        for entry in self.entries {
            if y >= inner.y + inner.height {
                break;
            }

            let color = self.status_color(entry.status);
            let symbol = Self::status_symbol(entry.status);

            let line = Line::from(vec![
                Span::styled(format!("{} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{}: ", entry.label),
                    Style::default()
                        .fg(self.colors.fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(&entry.value, Style::default().fg(color)),
            ]);

            buf.set_line(inner.x, y, &line, inner.width);
            y += 1;
        }
    }
}

/// Widget for the help screen
pub struct HelpPanel {
    pub colors: ThemeColors,
}

impl Widget for HelpPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Help - Rhythm Captcha")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.accent));

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = vec![
            "",
            " CHALLENGE FLOW",
            " --------------",
            " p                : Play a new rhythm pattern",
            " Space            : Tap along (after playback finishes)",
            " v                : Verify your taps",
            " r                : Reset and start over",
            "",
            " NAVIGATION",
            " --------------",
            " Tab / Shift+Tab  : Switch between views",
            " 1-3              : Jump to specific view",
            " ?                : Show this help",
            " q / Esc          : Quit",
            "",
            " VIEWS",
            " --------------",
            " 1. Challenge     : Current phase, taps and verdict",
            " 2. Stats         : Interval statistics for your taps",
            " 3. Help          : This screen",
            "",
            " Listen to the full pattern, then tap it back in the same",
            " rhythm. Tempo does not matter, only the shape. Perfectly",
            " even machine timing is rejected.",
        ];

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if line.contains("---") {
                Style::default().fg(self.colors.dim)
            } else if line.starts_with(' ')
                && line
                    .chars()
                    .nth(1)
                    .map(|c| c.is_uppercase())
                    .unwrap_or(false)
            {
                Style::default()
                    .fg(self.colors.yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.fg)
            };
            buf.set_string(inner.x, inner.y + i as u16, line, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    phase: &'a str,
    view: &'a str,
    elapsed: &'a str,
    taps: u64,
    message: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(phase: &'a str, view: &'a str, elapsed: &'a str, taps: u64) -> Self {
        Self {
            phase,
            view,
            elapsed,
            taps,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        let left = format!(" {} | {} ", self.phase, self.view);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        if let Some(msg) = self.message {
            let msg_style = Style::default().bg(Color::DarkGray).fg(Color::Yellow);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        let right = format!(" {} | Taps: {} ", self.elapsed, self.taps);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}

/// Tab bar widget
pub struct TabBar<'a> {
    tabs: &'a [&'a str],
    selected: usize,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [&'a str], selected: usize) -> Self {
        Self { tabs, selected }
    }
}

impl<'a> Widget for TabBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut x = area.x;

        for (i, tab) in self.tabs.iter().enumerate() {
            let is_selected = i == self.selected;

            let style = if is_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            };

            let label = format!(" {} ", tab);
            let width = label.len() as u16;

            if x + width <= area.x + area.width {
                buf.set_string(x, area.y, &label, style);
                x += width;

                if i < self.tabs.len() - 1 && x < area.x + area.width {
                    buf.set_string(x, area.y, "|", Style::default().fg(Color::DarkGray));
                    x += 1;
                }
            }
        }

        for fill_x in x..area.x + area.width {
            buf.set_string(fill_x, area.y, " ", Style::default().bg(Color::DarkGray));
        }
    }
}
