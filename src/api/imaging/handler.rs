// X-ray analysis handler: uploads go to MedGemma as base64 data URIs.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde_json::json;
use tracing::{info, instrument};

use crate::api::backend_failure;
use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

/// Analyzes an uploaded X-ray image. Expects a `file` multipart field.
#[instrument(name = "analyze_xray", skip(state, multipart))]
pub async fn analyze_xray_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> HandlerResponse {
    let mut image: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return HandlerResponse::new(StatusCode::BAD_REQUEST)
                    .data(json!({ "error": e.to_string() }))
                    .message("Malformed multipart upload");
            }
        };

        if field.name() == Some("file") {
            match field.bytes().await {
                Ok(bytes) => image = Some(bytes.to_vec()),
                Err(e) => {
                    return HandlerResponse::new(StatusCode::BAD_REQUEST)
                        .data(json!({ "error": e.to_string() }))
                        .message("Failed to read image upload");
                }
            }
        }
    }

    let Some(bytes) = image else {
        return HandlerResponse::new(StatusCode::BAD_REQUEST)
            .data(json!({ "error": "missing file field" }))
            .message("No image uploaded. Please upload an X-ray image first.");
    };

    info!("Analyzing X-ray image ({} bytes)", bytes.len());

    match state.backends.medgemma.analyze_xray(bytes).await {
        Ok(analysis) => HandlerResponse::new(StatusCode::OK)
            .data(json!({ "analysis": analysis }))
            .message("Analysis complete."),
        Err(e) => backend_failure("X-ray analysis", e),
    }
}
