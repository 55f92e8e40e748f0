//! HTTP API module
//!
//! Keypad endpoints driving the hosted picker, plus status and health.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/digit/:digit", post(digit_handler))
        .route("/delete", post(delete_handler))
        .route("/reset", post(reset_handler))
        .route("/key/:code", post(key_handler))
        .route("/time", get(get_time_handler).put(set_time_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
