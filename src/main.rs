//! HMS Picker - hosts a keypad duration picker over HTTP
//!
//! This is the main entry point for the hms-picker application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use hms_picker::{
    api::create_router,
    config::Config,
    state::{AppState, TimeUpdate},
    tasks::input_watcher_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("hms_picker={},tower_http=info", config.log_level()))
        .init();

    info!("Starting hms-picker server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}", config.host, config.port);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone()));

    // Start the input watcher before any input can arrive
    let watcher_state = Arc::clone(&state);
    let input_rx = state.input_change_tx.subscribe();
    let watcher = tokio::spawn(async move {
        input_watcher_task(watcher_state, input_rx).await;
    });

    restore_snapshot(&config, &state);

    if config.has_preset() {
        let view = state.set_time(&TimeUpdate {
            hours: config.hours,
            minutes: config.minutes,
            seconds: config.seconds,
            millis: None,
        })?;
        info!("Preset picker to {}", view.label);
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /digit/:digit - Append a digit (0-9)");
    info!("  POST /delete       - Delete the last digit");
    info!("  POST /reset        - Reset to 00h 00m 00s");
    info!("  POST /key/:code    - Dispatch a key code");
    info!("  GET  /time         - Current picker view");
    info!("  PUT  /time         - Set hours/minutes/seconds or millis");
    info!("  GET  /status       - Picker and server status");
    info!("  GET  /health       - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            result.context("Failed to install signal handler")?;
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    if let Err(e) = watcher.await {
        warn!("Input watcher ended abnormally: {}", e);
    }

    if let Some(path) = &config.state_file {
        let snapshot = state.save_state()?;
        snapshot
            .store(path)
            .with_context(|| format!("Failed to save picker state to {}", path.display()))?;
        info!("Saved picker state ({}ms) to {}", snapshot.time_in_millis, path.display());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Restore the picker from the configured snapshot file, if any
fn restore_snapshot(config: &Config, state: &AppState) {
    let Some(path) = &config.state_file else {
        return;
    };
    if !path.exists() {
        info!("No saved picker state at {}", path.display());
        return;
    }

    match state.restore_from_file(path) {
        Ok(true) => info!("Restored picker state from {}", path.display()),
        Ok(false) => {}
        Err(e) => warn!("Ignoring saved picker state: {}", e),
    }
}
