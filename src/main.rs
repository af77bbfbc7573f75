//! Rhythm Captcha - terminal human-verification challenge
//!
//! Plays a rhythm through the terminal bell and asks the user to tap it
//! back; the reproduction is scored for shape, and machine-perfect
//! timing fails.

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode as CtKeyCode, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    symbols::border,
    widgets::{Block, Borders},
    Terminal,
};
use std::io::{stdout, Write};

use rhythm_captcha::{
    config::Config,
    ui::{App, AppState, AppView, BeatTimeline, HelpPanel, ReadoutPanel, StatusBar, TabBar},
};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load().unwrap_or_default();

    // Setup terminal
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone());
    let tick_rate = config.refresh_interval();

    loop {
        // Fire due cues and pump deferred machine transitions
        app.tick();

        // Emit queued audio cues via the terminal bell
        let bells = app.take_bells();
        if bells > 0 {
            let mut raw = stdout();
            for _ in 0..bells {
                let _ = raw.write_all(b"\x07");
            }
            let _ = raw.flush();
        }

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Tab bar
                    Constraint::Length(5), // Beat timeline
                    Constraint::Min(10),   // Main content
                    Constraint::Length(1), // Status bar
                ])
                .split(size);

            // Tab bar
            let tab_names: Vec<&str> = AppView::all().iter().map(|v| v.name()).collect();
            let tab_bar = TabBar::new(&tab_names, app.view.index());
            frame.render_widget(tab_bar, chunks[0]);

            // Beat timeline
            let timeline_block = Block::default()
                .title(" \u{266a} Rhythm ")
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(Style::default().fg(app.colors.dim));
            let timeline_inner = timeline_block.inner(chunks[1]);
            frame.render_widget(timeline_block, chunks[1]);
            let timeline = BeatTimeline::new(&app.challenge, &app.player, app.colors)
                .flash(app.is_flashing());
            frame.render_widget(timeline, timeline_inner);

            // Main content area
            match app.view {
                AppView::Help => {
                    frame.render_widget(HelpPanel { colors: app.colors }, chunks[2]);
                }
                _ => {
                    let entries = app.current_entries();
                    let panel = ReadoutPanel::new(&entries, app.view.name(), app.colors);
                    frame.render_widget(panel, chunks[2]);
                }
            }

            // Status bar
            let elapsed = app.elapsed_formatted();
            let status = StatusBar::new(
                app.challenge.phase().name(),
                app.view.name(),
                &elapsed,
                app.total_taps,
            )
            .message(app.get_status());
            frame.render_widget(status, chunks[3]);
        })?;

        // Handle terminal events
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    CtKeyCode::Char('q') | CtKeyCode::Esc => app.quit(),
                    CtKeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                        app.prev_view();
                    }
                    CtKeyCode::Tab => app.next_view(),
                    CtKeyCode::Char(' ') => app.tap(),
                    CtKeyCode::Char('p') => app.play(),
                    CtKeyCode::Char('v') => app.request_verify(),
                    CtKeyCode::Char('r') => app.reset(),
                    CtKeyCode::Char('1') => app.view = AppView::Challenge,
                    CtKeyCode::Char('2') => app.view = AppView::Stats,
                    CtKeyCode::Char('3') | CtKeyCode::Char('?') => app.view = AppView::Help,
                    _ => {}
                }
            }
        }

        if app.state == AppState::Quitting {
            break;
        }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    println!("\nRhythm challenge session complete.");
    println!("Total taps recorded: {}", app.total_taps);
    match app.challenge.last_verdict() {
        Some(true) => println!("Final verdict: passed"),
        Some(false) => println!("Final verdict: failed"),
        None => println!("Final verdict: unresolved"),
    }
    println!("Session duration: {}", app.elapsed_formatted());

    Ok(())
}
