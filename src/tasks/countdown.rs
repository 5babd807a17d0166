//! Countdown scheduler background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::{AppState, RunSignal, Transition};

/// Background task that ticks the countdown while a run is active.
///
/// Every change of the run signal tears down the current interval, so a
/// tick scheduled for an earlier run never reaches the timer.
pub async fn countdown_task(state: Arc<AppState>, period: Duration) {
    info!("Starting countdown task ({}ms period)", period.as_millis());

    let mut run_rx = state.subscribe_runs();

    loop {
        let signal = *run_rx.borrow_and_update();

        if let Some(generation) = signal.running_generation() {
            if !run_countdown(&state, &mut run_rx, generation, period).await {
                break;
            }
            continue;
        }

        // Idle or finished, wait for the next run
        if run_rx.changed().await.is_err() {
            break;
        }
    }

    info!("Countdown task stopped");
}

/// Drive one run. Returns false once the state side has gone away.
async fn run_countdown(
    state: &AppState,
    run_rx: &mut watch::Receiver<RunSignal>,
    generation: u64,
    period: Duration,
) -> bool {
    debug!("Countdown run {} started", generation);

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match state.tick(generation) {
                    Ok(Transition::Updated) => {}
                    Ok(Transition::Completed) => {
                        debug!("Countdown run {} completed", generation);
                        return true;
                    }
                    Ok(Transition::Unchanged) => {
                        debug!("Countdown run {} is stale", generation);
                        return true;
                    }
                    Err(e) => {
                        error!("Failed to apply tick: {}", e);
                    }
                }
            }

            changed = run_rx.changed() => {
                if changed.is_err() {
                    return false;
                }
                debug!("Run signal changed, cancelling countdown run {}", generation);
                return true;
            }
        }
    }
}
