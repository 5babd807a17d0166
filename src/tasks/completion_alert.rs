//! Completion alert background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::{
    services::{play_completion_alert, AlertCommand},
    state::{AppState, TimerEvent},
};

/// Background task that plays the alert each time a countdown completes.
///
/// Alert failures are logged and otherwise ignored.
pub async fn completion_alert_task(state: Arc<AppState>, alert: AlertCommand) {
    info!("Starting completion alert task");

    let mut events = state.subscribe_events();

    loop {
        match events.recv().await {
            Ok(TimerEvent::Completed { preset }) => {
                debug!("Playing completion alert for {}", preset);
                if let Err(e) = play_completion_alert(&alert).await {
                    warn!("Completion alert failed: {}", e);
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Completion alert task lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
