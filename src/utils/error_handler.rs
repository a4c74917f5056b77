// Global error handler for middleware layers (timeouts, oversized
// payloads). Anything unrecognized falls through as a 500.

use axum::{http::StatusCode, response::IntoResponse, BoxError};
use http_body_util::LengthLimitError;
use std::error::Error;
use tower::timeout::error::Elapsed;

pub async fn handle_global_error(err: BoxError) -> impl IntoResponse {
    if let Some(e) = find_cause::<LengthLimitError>(&*err) {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Request body too large: {}", e),
        );
    }

    if let Some(e) = err.downcast_ref::<Elapsed>() {
        return (
            StatusCode::REQUEST_TIMEOUT,
            format!("Request timeout: {}", e),
        );
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Unhandled internal error: {}", err),
    )
}

/// Walks the source chain looking for a specific cause
pub fn find_cause<T: Error + 'static>(err: &dyn Error) -> Option<&T> {
    let mut source: Option<&dyn Error> = err.source();

    while let Some(s) = source {
        if let Some(typed) = s.downcast_ref::<T>() {
            return Some(typed);
        }
        source = s.source();
    }

    None
}
