// HTTP API surface, one routes/handler pair per feature.

pub mod diagnosis;
pub mod health;
pub mod imaging;
pub mod status;
pub mod transcription;
pub mod translation;
pub mod triage;

use axum::http::StatusCode;
use serde_json::json;
use tracing::error;

use crate::backends::BackendError;
use crate::utils::response_handler::HandlerResponse;

/// Maps a backend failure to a response: unconfigured backends are a
/// deployment problem (503), everything else is the backend's fault (502).
pub(crate) fn backend_failure(label: &str, err: BackendError) -> HandlerResponse {
    error!("{} request failed: {}", label, err);

    let status: StatusCode = match &err {
        BackendError::NotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    };

    HandlerResponse::new(status)
        .data(json!({ "error": err.to_string() }))
        .message(format!("{} request failed", label))
}
