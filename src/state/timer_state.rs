//! Timer state structure and countdown transitions

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PresetId;

/// Default custom duration, 5 minutes
pub const DEFAULT_CUSTOM_MINUTES: u64 = 5;
pub const DEFAULT_CUSTOM_SECONDS: u64 = 0;

/// Countdown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Finished => "finished",
        }
    }
}

/// Result of applying an operation to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Rejected or no-op, state untouched
    Unchanged,
    Updated,
    /// The countdown just reached zero
    Completed,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

/// Timer state for the egg countdown
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    selected: PresetId,
    phase: Phase,
    remaining_seconds: u64,
    custom_minutes: u64,
    custom_seconds: u64,
    quote_cursor: u64,
    overlay_visible: bool,
    run_generation: u64,
}

impl TimerState {
    /// Create a timer with the first preset selected
    pub fn new() -> Self {
        Self::with_defaults(PresetId::Soft, DEFAULT_CUSTOM_MINUTES, DEFAULT_CUSTOM_SECONDS)
    }

    /// Create an idle timer with the given preset and custom duration
    pub fn with_defaults(selected: PresetId, custom_minutes: u64, custom_seconds: u64) -> Self {
        let mut state = Self {
            selected,
            phase: Phase::Idle,
            remaining_seconds: 0,
            custom_minutes,
            custom_seconds: custom_seconds.min(59),
            quote_cursor: 0,
            overlay_visible: false,
            run_generation: 0,
        };
        state.remaining_seconds = state.total_duration_seconds();
        state
    }

    pub fn selected(&self) -> PresetId {
        self.selected
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn custom_minutes(&self) -> u64 {
        self.custom_minutes
    }

    pub fn custom_seconds(&self) -> u64 {
        self.custom_seconds
    }

    pub fn quote_cursor(&self) -> u64 {
        self.quote_cursor
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Token of the current run; ticks carrying an older token are stale
    pub fn run_generation(&self) -> u64 {
        self.run_generation
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Select a preset. Rejected while running.
    pub fn select_preset(&mut self, id: PresetId) -> Transition {
        if self.is_running() {
            debug!("Ignoring preset change to {} while running", id);
            return Transition::Unchanged;
        }

        self.selected = id;
        self.enter_idle();
        self.remaining_seconds = self.total_duration_seconds();
        Transition::Updated
    }

    /// Update the custom duration. Seconds are clamped to 0..=59.
    pub fn set_custom_duration(&mut self, minutes: u64, seconds: u64) -> Transition {
        let seconds = seconds.min(59);
        if self.custom_minutes == minutes && self.custom_seconds == seconds {
            return Transition::Unchanged;
        }

        self.custom_minutes = minutes;
        self.custom_seconds = seconds;
        if self.selected.is_custom() && self.phase == Phase::Idle {
            self.remaining_seconds = self.total_duration_seconds();
        }
        Transition::Updated
    }

    /// Start or resume the countdown
    pub fn start(&mut self) -> Transition {
        match self.phase {
            Phase::Running => return Transition::Unchanged,
            Phase::Finished => self.remaining_seconds = self.total_duration_seconds(),
            Phase::Idle => {}
        }

        self.overlay_visible = false;
        self.run_generation += 1;

        if self.remaining_seconds == 0 {
            // Nothing to count down, finish without ever sitting at zero while running
            self.finish();
            return Transition::Completed;
        }

        self.phase = Phase::Running;
        Transition::Updated
    }

    /// Pause, keeping the remaining time. Only a running countdown pauses.
    pub fn pause(&mut self) -> Transition {
        if !self.is_running() {
            return Transition::Unchanged;
        }

        self.enter_idle();
        Transition::Updated
    }

    /// Stop and reload the full duration of the selected preset
    pub fn reset(&mut self) -> Transition {
        let total = self.total_duration_seconds();
        if self.phase == Phase::Idle && self.remaining_seconds == total && !self.overlay_visible {
            return Transition::Unchanged;
        }

        self.enter_idle();
        self.remaining_seconds = total;
        Transition::Updated
    }

    /// Acknowledge the completion overlay
    pub fn dismiss_completion(&mut self) -> Transition {
        self.reset()
    }

    /// One elapsed second. Only meaningful while running.
    pub fn tick(&mut self) -> Transition {
        if !self.is_running() {
            return Transition::Unchanged;
        }

        if self.remaining_seconds <= 1 {
            self.finish();
            return Transition::Completed;
        }

        self.remaining_seconds -= 1;
        Transition::Updated
    }

    pub fn advance_quote_cursor(&mut self) {
        self.quote_cursor = self.quote_cursor.wrapping_add(1);
    }

    /// Full duration of the selected preset, or the custom total
    pub fn total_duration_seconds(&self) -> u64 {
        if self.selected.is_custom() {
            self.custom_minutes
                .saturating_mul(60)
                .saturating_add(self.custom_seconds)
        } else {
            self.selected.preset().default_duration_seconds
        }
    }

    /// Elapsed share of the total duration in 0.0..=1.0
    pub fn progress_fraction(&self) -> f64 {
        let total = self.total_duration_seconds();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total as f64 - self.remaining_seconds as f64;
        (elapsed / total as f64).clamp(0.0, 1.0)
    }

    pub fn minutes_display(&self) -> u64 {
        self.remaining_seconds / 60
    }

    pub fn seconds_tens_digit(&self) -> u64 {
        (self.remaining_seconds % 60) / 10
    }

    pub fn seconds_units_digit(&self) -> u64 {
        self.remaining_seconds % 10
    }

    /// Countdown formatted as M:SS
    pub fn display_text(&self) -> String {
        format!(
            "{}:{}{}",
            self.minutes_display(),
            self.seconds_tens_digit(),
            self.seconds_units_digit()
        )
    }

    pub fn current_quote(&self) -> &'static str {
        self.selected.preset().quote(self.phase, self.quote_cursor)
    }

    /// Status banner text
    pub fn headline(&self) -> &'static str {
        match self.phase {
            Phase::Idle => "READY TO RUMBLE",
            Phase::Running => "COOKING...",
            Phase::Finished => "READY!",
        }
    }

    fn enter_idle(&mut self) {
        self.phase = Phase::Idle;
        self.overlay_visible = false;
        self.run_generation += 1;
    }

    fn finish(&mut self) {
        self.remaining_seconds = 0;
        self.phase = Phase::Finished;
        self.overlay_visible = true;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
