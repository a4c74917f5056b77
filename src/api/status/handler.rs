// Service status handler

use axum::{extract::State, http::StatusCode};
use serde_json::json;
use tracing::instrument;

use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

/// Basic liveness endpoint with build information
#[instrument(skip(state))]
pub async fn status_handler(State(state): State<AppState>) -> HandlerResponse {
    HandlerResponse::new(StatusCode::OK)
        .data(json!({
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "environment": state.environment.environment,
        }))
        .message("Service is running")
}
