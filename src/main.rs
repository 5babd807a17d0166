//! Egg-O-Matic - An egg cooking battle timer served over HTTP
//!
//! This is the main entry point for the egg-o-matic application.

use std::sync::Arc;
use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing::{info, warn};

use egg_o_matic::{
    api::create_router,
    config::Config,
    services::check_alert_available,
    state::AppState,
    tasks::{completion_alert_task, countdown_task, quote_rotation_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("egg_o_matic={},tower_http=info", config.log_level()))
        .init();

    info!("Starting egg-o-matic v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, preset={}, tick={}ms",
          config.host, config.port, config.preset, config.tick_ms);

    let alert = config.alert().map_err(|e| anyhow!(e))?;

    // A missing alert program only costs us the sound
    if let Err(e) = check_alert_available(&alert).await {
        warn!("{}", e);
    }

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.initial_timer()));

    // Start the background tasks
    let tasks = vec![
        tokio::spawn(countdown_task(Arc::clone(&state), config.tick_period())),
        tokio::spawn(quote_rotation_task(Arc::clone(&state), config.quote_period())),
        tokio::spawn(completion_alert_task(Arc::clone(&state), alert)),
    ];

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /presets           - List fighters");
    info!("  POST /preset/:preset_id - Select a fighter");
    info!("  POST /custom            - Set custom minutes/seconds");
    info!("  POST /start | /pause | /toggle | /reset | /dismiss");
    info!("  GET  /status            - Current timer view");
    info!("  GET  /events            - Server-sent timer events");
    info!("  GET  /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // No tick may outlive the app
    for task in tasks {
        task.abort();
    }

    info!("Server shutdown complete");
    Ok(())
}
