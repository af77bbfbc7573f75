//! Main application state and logic

use crate::challenge::{intervals_ms, variance, Challenge, Phase, MIN_HUMAN_VARIANCE_MS2};
use crate::config::Config;
use crate::playback::CuePlayer;
use crate::ui::theme::ThemeColors;
use crate::ui::widgets::PanelEntry;
use crate::utils::{format_mmss, format_ms};
use std::time::Instant;

/// How long the cue indicator stays lit after a playback cue, in ms
const CUE_FLASH_MS: u64 = 120;
/// How long the indicator stays lit after an accepted tap, in ms
const TAP_FLASH_MS: u64 = 80;

/// Current view/tab in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Challenge,
    Stats,
    Help,
}

impl AppView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Challenge => "Challenge",
            Self::Stats => "Stats",
            Self::Help => "Help",
        }
    }

    pub fn all() -> &'static [AppView] {
        &[Self::Challenge, Self::Stats, Self::Help]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Challenge => 0,
            Self::Stats => 1,
            Self::Help => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Challenge,
            1 => Self::Stats,
            _ => Self::Help,
        }
    }
}

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// Main application: owns the challenge, the cue player and the session
/// clock, and translates user intents into machine operations.
pub struct App {
    /// Current view
    pub view: AppView,
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    /// The live challenge
    pub challenge: Challenge,
    /// Cue playback schedule
    pub player: CuePlayer,
    /// Active color palette
    pub colors: ThemeColors,
    /// Taps accepted over the whole session
    pub total_taps: u64,
    /// Session epoch; all machine timestamps are ms since this instant
    epoch: Instant,
    /// Last status message
    status_message: Option<String>,
    /// Status message timestamp
    status_time: Option<Instant>,
    /// Cue indicator lit until this session time
    flash_until_ms: u64,
    /// Terminal bells queued for the main loop to emit
    bell_queue: u32,
}

impl App {
    pub fn new(config: Config) -> Self {
        let challenge = Challenge::new().with_timings(
            config.challenge.trailing_buffer_ms,
            config.challenge.verify_delay_ms,
        );
        let colors = ThemeColors::from_theme(config.ui.theme);
        Self {
            view: AppView::Challenge,
            state: AppState::Running,
            config,
            challenge,
            player: CuePlayer::new(),
            colors,
            total_taps: 0,
            epoch: Instant::now(),
            status_message: None,
            status_time: None,
            flash_until_ms: 0,
            bell_queue: 0,
        }
    }

    /// Milliseconds since the session epoch
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Advance time-driven state: fire due cues and pump the machine's
    /// deferred transitions.
    pub fn tick(&mut self) {
        let now = self.now_ms();

        let fired = self.player.poll(now);
        if fired > 0 {
            self.flash_until_ms = now + CUE_FLASH_MS;
            if self.config.audio.cue_bell {
                self.bell_queue += fired as u32;
            }
        }

        let before = self.challenge.phase();
        self.challenge.tick(now);
        let after = self.challenge.phase();

        if before != after {
            match after {
                Phase::AwaitingTaps => {
                    self.set_status("Tap the rhythm back, then press v".to_string())
                }
                Phase::Passed => self.set_status("Verification successful".to_string()),
                Phase::Failed => self.set_status("Verification failed - r to retry".to_string()),
                _ => {}
            }
        }
    }

    /// Play a new pattern (no-op unless idle or resolved)
    pub fn play(&mut self) {
        let now = self.now_ms();
        if let Some(offsets) = self.challenge.start_playback(now) {
            self.player.schedule(&offsets, now);
            self.set_status(format!("Listen: {} cues", offsets.len()));
        }
    }

    /// Record a tap; accepted only while awaiting taps
    pub fn tap(&mut self) {
        let now = self.now_ms();
        if self.challenge.record_tap(now) {
            self.total_taps += 1;
            self.flash_until_ms = now + TAP_FLASH_MS;
            if self.config.audio.tap_feedback {
                self.bell_queue += 1;
            }
        }
    }

    /// Request verification of the captured taps
    pub fn request_verify(&mut self) {
        let now = self.now_ms();
        if self.challenge.verify(now) {
            self.set_status("Verifying...".to_string());
        }
    }

    /// Abandon the current attempt and return to idle
    pub fn reset(&mut self) {
        self.challenge.reset();
        self.player.clear();
        self.set_status("Reset".to_string());
    }

    /// Whether the cue indicator should be lit this frame
    pub fn is_flashing(&self) -> bool {
        self.now_ms() < self.flash_until_ms
    }

    /// Drain the queued terminal bells
    pub fn take_bells(&mut self) -> u32 {
        std::mem::take(&mut self.bell_queue)
    }

    /// Switch to the next view
    pub fn next_view(&mut self) {
        let next = (self.view.index() + 1) % AppView::all().len();
        self.view = AppView::from_index(next);
    }

    /// Switch to the previous view
    pub fn prev_view(&mut self) {
        let current = self.view.index();
        let prev = if current == 0 {
            AppView::all().len() - 1
        } else {
            current - 1
        };
        self.view = AppView::from_index(prev);
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still valid (within 3 seconds)
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed().as_secs() < 3 => Some(msg),
            _ => None,
        }
    }

    /// Get readout entries for the current view
    pub fn current_entries(&self) -> Vec<PanelEntry> {
        match self.view {
            AppView::Challenge => self.challenge_entries(),
            AppView::Stats => self.stats_entries(),
            AppView::Help => Vec::new(),
        }
    }

    fn challenge_entries(&self) -> Vec<PanelEntry> {
        let mut entries = Vec::new();
        let phase = self.challenge.phase();

        entries.push(PanelEntry::info("Phase", phase.name()));

        if let Some(pattern) = self.challenge.pattern() {
            let beats = if phase == Phase::Playing {
                "(listening)".to_string()
            } else {
                format!("{}", pattern.len())
            };
            entries.push(PanelEntry::info("Beats", beats));
        }

        entries.push(PanelEntry::info(
            "Taps recorded",
            format!("{}", self.challenge.taps().len()),
        ));

        match self.challenge.last_verdict() {
            Some(true) => entries.push(PanelEntry::ok("Verdict", "passed - human rhythm")),
            Some(false) => entries.push(PanelEntry::error("Verdict", "failed")),
            None => {}
        }

        let hint = match phase {
            Phase::Idle => "press p to play a rhythm",
            Phase::Playing => "listen carefully...",
            Phase::AwaitingTaps => "Space to tap, v to verify",
            Phase::Verifying => "checking your rhythm...",
            Phase::Passed | Phase::Failed => "p to try a new rhythm, r to reset",
        };
        entries.push(PanelEntry::info("Next", hint));

        entries
    }

    fn stats_entries(&self) -> Vec<PanelEntry> {
        let mut entries = Vec::new();
        let intervals = intervals_ms(self.challenge.taps());

        entries.push(PanelEntry::info(
            "Intervals",
            format!("{}", intervals.len()),
        ));

        if intervals.is_empty() {
            entries.push(PanelEntry::info("Hint", "record at least two taps"));
            return entries;
        }

        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
        let min = intervals.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = intervals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        entries.push(PanelEntry::info("Mean interval", format_ms(mean)));
        entries.push(PanelEntry::info("Min interval", format_ms(min)));
        entries.push(PanelEntry::info("Max interval", format_ms(max)));

        let spread = variance(&intervals);
        entries.push(PanelEntry::info(
            "Raw variance",
            format!("{:.3} ms\u{b2}", spread),
        ));

        if intervals.len() >= 2 {
            if spread < MIN_HUMAN_VARIANCE_MS2 {
                entries.push(PanelEntry::warning("Timing guard", "mechanically even"));
            } else {
                entries.push(PanelEntry::ok("Timing guard", "human-like spread"));
            }
        }

        entries
    }

    /// Get elapsed session time formatted as MM:SS
    pub fn elapsed_formatted(&self) -> String {
        format_mmss(self.epoch.elapsed().as_secs())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
