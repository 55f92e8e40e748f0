//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    error::PickerError,
    state::{parse_digit, AppState, Key, PickerView, TimeUpdate},
};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn error_response(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// Map a picker error onto an HTTP status
fn picker_error(e: PickerError) -> ApiError {
    match e {
        PickerError::InvalidDigit(_) | PickerError::InvalidKey(_) => {
            warn!("Rejected input: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        PickerError::StatePoisoned(_) | PickerError::Snapshot(_) => {
            error!("Picker failure: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn respond(result: Result<PickerView, PickerError>, message: &str) -> ApiResult<ApiResponse> {
    result
        .map(|view| Json(ApiResponse::new(message.to_string(), view)))
        .map_err(picker_error)
}

/// Handle POST /digit/:digit - Append a digit
pub async fn digit_handler(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<ApiResponse> {
    info!("Digit endpoint called with {}", code);
    let digit = parse_digit(&code).map_err(picker_error)?;
    respond(state.append(digit), "Digit appended")
}

/// Handle POST /delete - Remove the last digit
pub async fn delete_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    info!("Delete endpoint called");
    respond(state.delete(), "Digit deleted")
}

/// Handle POST /reset - Long press on delete
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    info!("Reset endpoint called");
    respond(state.reset(), "Picker reset")
}

/// Handle POST /key/:code - Dispatch a key code to its keypad button
pub async fn key_handler(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<ApiResponse> {
    let Some(key) = Key::from_code(&code) else {
        warn!("Unhandled key code: {}", code);
        return Err(error_response(
            StatusCode::NOT_FOUND,
            format!("Key not handled: {}", code),
        ));
    };
    respond(state.press(key), "Key handled")
}

/// Handle GET /time - Return the current picker view
pub async fn get_time_handler(State(state): State<Arc<AppState>>) -> ApiResult<PickerView> {
    state.get_view().map(Json).map_err(picker_error)
}

/// Handle PUT /time - Set fields or the whole time in milliseconds
pub async fn set_time_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<TimeUpdate>,
) -> ApiResult<ApiResponse> {
    info!("Set time endpoint called: {:?}", update);
    respond(state.set_time(&update), "Time updated")
}

/// Handle GET /status - Return picker and host status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let picker = state.get_view().map_err(picker_error)?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        picker,
        ready: state.is_ready(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
