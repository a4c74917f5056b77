// Diagnosis handler: runs practitioner notes through MedReason and
// returns the reasoning sections plus the structured triage summary.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::api::backend_failure;
use crate::backends::medreason::Diagnosis;
use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    pub notes: String,
}

#[instrument(name = "diagnose", skip(state, request))]
pub async fn diagnose_handler(
    State(state): State<AppState>,
    Json(request): Json<DiagnoseRequest>,
) -> HandlerResponse {
    if request.notes.trim().is_empty() {
        return HandlerResponse::new(StatusCode::BAD_REQUEST)
            .data(json!({ "error": "notes cannot be empty" }))
            .message("No transcription to analyze. Please transcribe audio first.");
    }

    info!("Running triage analysis ({} chars of notes)", request.notes.len());

    match state.backends.medreason.diagnose(&request.notes).await {
        Ok(diagnosis) => diagnosis_response(diagnosis),
        Err(e) => backend_failure("Diagnosis", e),
    }
}

fn diagnosis_response(diagnosis: Diagnosis) -> HandlerResponse {
    let summary_missing: bool = diagnosis.summary.is_none();

    let mut response: HandlerResponse = HandlerResponse::new(StatusCode::OK)
        .data(json!({
            "raw": diagnosis.raw,
            "sections": diagnosis.sections,
            "summary": diagnosis.summary,
        }))
        .message("Analysis complete.");

    if summary_missing {
        response = response.message("No triage summary JSON found in the model response.");
    }

    response
}
