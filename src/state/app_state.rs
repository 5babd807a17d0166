//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{Phase, PresetId, TimerState, Transition};

/// What the countdown scheduler should be doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSignal {
    pub generation: u64,
    pub running: bool,
}

impl RunSignal {
    fn from_timer(timer: &TimerState) -> Self {
        Self {
            generation: timer.run_generation(),
            running: timer.is_running(),
        }
    }

    /// Generation to tick for, if a run is active
    pub fn running_generation(&self) -> Option<u64> {
        self.running.then_some(self.generation)
    }
}

/// Notifications pushed to the presentation surface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// A preset was picked; drives the brief selection flash
    PresetSelected { preset: PresetId },
    PhaseChanged { phase: Phase },
    /// The countdown reached zero
    Completed { preset: PresetId },
}

impl TimerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::PresetSelected { .. } => "preset_selected",
            TimerEvent::PhaseChanged { .. } => "phase_changed",
            TimerEvent::Completed { .. } => "completed",
        }
    }
}

/// Main application state that owns the timer and fans out its changes
#[derive(Debug)]
pub struct AppState {
    /// The single countdown, guarded by one lock
    pub timer_state: Arc<Mutex<TimerState>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for presentation events
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Channel for timer snapshots, streamed on /events
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Channel consumed by the countdown scheduler
    pub run_tx: watch::Sender<RunSignal>,
}

impl AppState {
    /// Create a new AppState around an idle timer
    pub fn new(port: u16, host: String, timer: TimerState) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (timer_update_tx, _) = watch::channel(timer.clone());
        let (run_tx, _) = watch::channel(RunSignal::from_timer(&timer));

        Self {
            timer_state: Arc::new(Mutex::new(timer)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            timer_update_tx,
            run_tx,
        }
    }

    /// Apply an operation and publish the outcome.
    ///
    /// The run signal, snapshot and events go out before the timer lock is
    /// released, so subscribers see them in the order the changes happened.
    fn apply<F>(&self, action: Option<&str>, op: F) -> Result<(Transition, TimerState), String>
    where
        F: FnOnce(&mut TimerState) -> Transition,
    {
        let mut timer = self.timer_state.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let previous_phase = timer.phase();
        let transition = op(&mut *timer);
        let snapshot = timer.clone();

        // watch and broadcast sends never block
        if transition.is_applied() {
            self.publish(previous_phase, transition, &snapshot);
        }
        drop(timer);

        if let Some(action) = action {
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        Ok((transition, snapshot))
    }

    fn publish(&self, previous_phase: Phase, transition: Transition, snapshot: &TimerState) {
        let signal = RunSignal::from_timer(snapshot);
        self.run_tx.send_if_modified(|current| {
            if *current == signal {
                false
            } else {
                *current = signal;
                true
            }
        });
        self.timer_update_tx.send_replace(snapshot.clone());

        if previous_phase != snapshot.phase() {
            self.emit(TimerEvent::PhaseChanged { phase: snapshot.phase() });
        }
        if transition == Transition::Completed {
            info!("Countdown for {} complete", snapshot.selected());
            self.emit(TimerEvent::Completed { preset: snapshot.selected() });
        }
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is normal when nobody is watching
        if let Err(e) = self.event_tx.send(event) {
            debug!("No listeners for timer event: {}", e);
        }
    }

    /// Select a preset; silently ignored while running
    pub fn select_preset(&self, id: PresetId) -> Result<(Transition, TimerState), String> {
        let (transition, snapshot) = self.apply(Some("select"), |timer| {
            let transition = timer.select_preset(id);
            if transition.is_applied() {
                self.emit(TimerEvent::PresetSelected { preset: id });
            }
            transition
        })?;
        if transition.is_applied() {
            info!("Selected preset {} ({}s)", id, snapshot.remaining_seconds());
        } else {
            warn!("Preset change to {} rejected while running", id);
        }
        Ok((transition, snapshot))
    }

    /// Update the custom duration
    pub fn set_custom_duration(&self, minutes: u64, seconds: u64) -> Result<(Transition, TimerState), String> {
        debug!("Setting custom duration to {}m {}s", minutes, seconds);
        self.apply(Some("custom"), |timer| timer.set_custom_duration(minutes, seconds))
    }

    pub fn start(&self) -> Result<(Transition, TimerState), String> {
        let result = self.apply(Some("start"), TimerState::start)?;
        info!("Start requested, {}s remaining", result.1.remaining_seconds());
        Ok(result)
    }

    pub fn pause(&self) -> Result<(Transition, TimerState), String> {
        let result = self.apply(Some("pause"), TimerState::pause)?;
        info!("Pause requested, {}s remaining", result.1.remaining_seconds());
        Ok(result)
    }

    /// Start when not running, pause when running
    pub fn toggle(&self) -> Result<(Transition, TimerState), String> {
        self.apply(Some("toggle"), |timer| {
            if timer.is_running() {
                timer.pause()
            } else {
                timer.start()
            }
        })
    }

    pub fn reset(&self) -> Result<(Transition, TimerState), String> {
        info!("Reset requested");
        self.apply(Some("reset"), TimerState::reset)
    }

    pub fn dismiss_completion(&self) -> Result<(Transition, TimerState), String> {
        info!("Completion overlay dismissed");
        self.apply(Some("dismiss"), TimerState::dismiss_completion)
    }

    /// Apply one elapsed second for the run identified by `generation`
    pub fn tick(&self, generation: u64) -> Result<Transition, String> {
        let (transition, snapshot) = self.apply(None, |timer| {
            if timer.run_generation() != generation {
                return Transition::Unchanged;
            }
            timer.tick()
        })?;

        if transition == Transition::Unchanged {
            debug!("Dropped stale tick for run {}", generation);
        } else {
            debug!("Tick: {}s remaining", snapshot.remaining_seconds());
        }
        Ok(transition)
    }

    /// Rotate the flavor quote
    pub fn advance_quote_cursor(&self) -> Result<(), String> {
        self.apply(None, |timer| {
            timer.advance_quote_cursor();
            Transition::Updated
        })?;
        Ok(())
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.timer_state.lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    pub fn subscribe_runs(&self) -> watch::Receiver<RunSignal> {
        self.run_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), TimerState::new())
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let state = app();
        let (_, snapshot) = state.start().unwrap();
        let stale = snapshot.run_generation();

        state.reset().unwrap();
        state.start().unwrap();

        assert_eq!(state.tick(stale).unwrap(), Transition::Unchanged);
        assert_eq!(state.get_timer_state().unwrap().remaining_seconds(), 180);
    }

    #[test]
    fn test_run_signal_follows_phase() {
        let state = app();
        let runs = state.subscribe_runs();
        assert_eq!(runs.borrow().running_generation(), None);

        let (_, snapshot) = state.start().unwrap();
        assert_eq!(runs.borrow().running_generation(), Some(snapshot.run_generation()));

        state.pause().unwrap();
        assert_eq!(runs.borrow().running_generation(), None);
    }

    #[test]
    fn test_completion_event_fires_once() {
        let state = app();
        state.select_preset(PresetId::Custom).unwrap();
        state.set_custom_duration(0, 3).unwrap();
        let mut events = state.subscribe_events();

        let (_, snapshot) = state.start().unwrap();
        let generation = snapshot.run_generation();
        for _ in 0..6 {
            state.tick(generation).unwrap();
        }

        let mut completions = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, TimerEvent::Completed { .. }) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(state.get_timer_state().unwrap().phase(), Phase::Finished);
    }

    #[test]
    fn test_rejected_select_emits_nothing() {
        let state = app();
        state.start().unwrap();
        let mut events = state.subscribe_events();

        let (transition, snapshot) = state.select_preset(PresetId::Jammy).unwrap();
        assert_eq!(transition, Transition::Unchanged);
        assert_eq!(snapshot.selected(), PresetId::Soft);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_select_emits_flash() {
        let state = app();
        let mut events = state.subscribe_events();
        state.select_preset(PresetId::Hard).unwrap();

        let received: Vec<TimerEvent> = std::iter::from_fn(|| events.try_recv().ok()).collect();
        assert!(received.contains(&TimerEvent::PresetSelected { preset: PresetId::Hard }));
        assert_eq!(state.get_last_action().0.as_deref(), Some("select"));
    }

    #[test]
    fn test_run_signal_matches_state_after_racing_intents() {
        use std::{sync::Barrier, thread};

        let state = Arc::new(app());
        let runs = state.subscribe_runs();

        for _ in 0..2_000 {
            state.start().unwrap();
            let barrier = Arc::new(Barrier::new(2));

            let pausing = {
                let (state, barrier) = (Arc::clone(&state), Arc::clone(&barrier));
                thread::spawn(move || {
                    barrier.wait();
                    state.pause().unwrap();
                })
            };
            let starting = {
                let (state, barrier) = (Arc::clone(&state), Arc::clone(&barrier));
                thread::spawn(move || {
                    barrier.wait();
                    state.start().unwrap();
                })
            };
            pausing.join().unwrap();
            starting.join().unwrap();

            let timer = state.get_timer_state().unwrap();
            assert_eq!(*runs.borrow(), RunSignal::from_timer(&timer));
            assert_eq!(*state.subscribe_snapshots().borrow(), timer);

            state.reset().unwrap();
        }
    }

    #[test]
    fn test_snapshot_channel_tracks_ticks() {
        let state = app();
        let snapshots = state.subscribe_snapshots();
        let (_, snapshot) = state.start().unwrap();
        state.tick(snapshot.run_generation()).unwrap();

        assert_eq!(snapshots.borrow().remaining_seconds(), 179);
        assert_eq!(snapshots.borrow().phase(), Phase::Running);
    }

    #[test]
    fn test_toggle_alternates() {
        let state = app();
        let (_, snapshot) = state.toggle().unwrap();
        assert_eq!(snapshot.phase(), Phase::Running);
        let (_, snapshot) = state.toggle().unwrap();
        assert_eq!(snapshot.phase(), Phase::Idle);
    }
}
