// Translation handler: forwards text to NLLB. Identical source and
// target languages short-circuit without a backend call.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::api::backend_failure;
use crate::backends::Language;
use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

#[instrument(name = "translate", skip(state, request))]
pub async fn translate_handler(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> HandlerResponse {
    if request.text.trim().is_empty() {
        return HandlerResponse::new(StatusCode::BAD_REQUEST)
            .data(json!({ "error": "text cannot be empty" }))
            .message("No text to translate. Please transcribe audio first.");
    }

    let Some(source) = Language::parse(&request.source_language) else {
        return unsupported_language(&request.source_language);
    };
    let Some(target) = Language::parse(&request.target_language) else {
        return unsupported_language(&request.target_language);
    };

    if source == target {
        return HandlerResponse::new(StatusCode::OK)
            .data(json!({
                "translation": request.text,
                "source_language": source.display_name(),
                "target_language": target.display_name(),
            }))
            .message(format!("Translation skipped (both languages are {}).", source));
    }

    info!("Translating from {} to {}", source, target);

    match state.backends.nllb.translate(&request.text, source, target).await {
        Ok(translation) => HandlerResponse::new(StatusCode::OK)
            .data(json!({
                "translation": translation,
                "source_language": source.display_name(),
                "target_language": target.display_name(),
            }))
            .message(format!("Translated from {} to {}.", source, target)),
        Err(e) => backend_failure("Translation", e),
    }
}

fn unsupported_language(raw: &str) -> HandlerResponse {
    HandlerResponse::new(StatusCode::BAD_REQUEST)
        .data(json!({ "error": format!("unsupported language: {raw}") }))
        .message("Unsupported language")
}
