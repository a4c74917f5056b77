// Triage record route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handler;
use crate::config::state::AppState;

pub fn triage_routes() -> Router<AppState> {
    Router::new()
        .route("/triage/records", post(handler::create_record_handler))
        .route("/triage/records", get(handler::list_records_handler))
}
