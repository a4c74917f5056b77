// Triage record handlers: persist and list structured triage
// summaries in MySQL.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info, instrument};

use crate::config::state::AppState;
use crate::database::triage_repository::{self, TriageSummary};
use crate::utils::response_handler::HandlerResponse;

const LIST_LIMIT: u32 = 50;

/// Saves a structured triage summary to the database and returns the
/// new record id.
#[instrument(name = "create_triage_record", skip(state, summary))]
pub async fn create_record_handler(
    State(state): State<AppState>,
    Json(summary): Json<TriageSummary>,
) -> HandlerResponse {
    let patient_name: &str = summary.patient_name.as_deref().unwrap_or("").trim();
    if patient_name.is_empty() {
        return HandlerResponse::new(StatusCode::BAD_REQUEST)
            .data(json!({ "error": "patient_name is required" }))
            .message("No valid data to save to database.");
    }

    info!("Saving triage record for patient");

    let pool: &MySqlPool = match state.database.pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database unavailable: {:#}", e);
            return HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .data(json!({ "error": "database_unavailable" }))
                .message("Failed to save diagnosis to database");
        }
    };

    match triage_repository::insert_summary(pool, &summary).await {
        Ok(id) => HandlerResponse::new(StatusCode::CREATED)
            .data(json!({ "id": id }))
            .message(format!("Diagnosis saved successfully to database with ID: {id}")),
        Err(e) => {
            error!("Failed to insert triage record: {:#}", e);
            HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .data(json!({ "error": "insert_failed" }))
                .message("Failed to save diagnosis to database")
        }
    }
}

/// Lists the most recent triage records.
#[instrument(name = "list_triage_records", skip(state))]
pub async fn list_records_handler(State(state): State<AppState>) -> HandlerResponse {
    let pool: &MySqlPool = match state.database.pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database unavailable: {:#}", e);
            return HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .data(json!({ "error": "database_unavailable" }))
                .message("Failed to list triage records");
        }
    };

    match triage_repository::list_recent(pool, LIST_LIMIT).await {
        Ok(records) => {
            let count: usize = records.len();

            HandlerResponse::new(StatusCode::OK)
                .data(json!({ "records": records, "count": count }))
                .message("Triage records retrieved")
        }
        Err(e) => {
            error!("Failed to list triage records: {:#}", e);
            HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .data(json!({ "error": "query_failed" }))
                .message("Failed to list triage records")
        }
    }
}
