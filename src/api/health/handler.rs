// Backend health handler: probes all four inference services.

use axum::{extract::State, http::StatusCode};
use serde_json::json;
use tracing::{info, instrument};

use crate::backends::HealthReport;
use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

/// Probes MedReason, Whisper, NLLB and MedGemma concurrently.
/// Always answers 200; per-backend status lives in the payload.
#[instrument(name = "model_health", skip(state))]
pub async fn model_health_handler(State(state): State<AppState>) -> HandlerResponse {
    info!("Checking health of all inference backends");

    let reports: Vec<HealthReport> = state.backends.check_all().await;
    let all_healthy: bool = reports.iter().all(|r| r.healthy);

    let message: &str = if all_healthy {
        "All backends available"
    } else {
        "One or more backends unavailable"
    };

    HandlerResponse::new(StatusCode::OK)
        .data(json!({
            "backends": reports,
            "all_healthy": all_healthy,
        }))
        .message(message)
}
