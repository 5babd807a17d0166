//! Flavor quote rotation background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::{info, warn};

use crate::state::AppState;

/// Background task that advances the quote cursor on a fixed cadence
pub async fn quote_rotation_task(state: Arc<AppState>, period: Duration) {
    info!("Starting quote rotation task");

    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        if let Err(e) = state.advance_quote_cursor() {
            warn!("Failed to rotate quote: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimerState;

    #[tokio::test(start_paused = true)]
    async fn test_cursor_advances_every_period() {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), TimerState::new()));
        let handle = tokio::spawn(quote_rotation_task(Arc::clone(&state), Duration::from_secs(5)));

        tokio::time::sleep(Duration::from_secs(12)).await;
        tokio::task::yield_now().await;

        let timer = state.get_timer_state().unwrap();
        assert_eq!(timer.quote_cursor(), 2);
        assert_eq!(timer.current_quote(), "I'm not ready!");

        handle.abort();
    }
}
