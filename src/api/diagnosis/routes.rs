// Diagnosis route definitions

use axum::{routing::post, Router};

use super::handler;
use crate::config::state::AppState;

pub fn diagnosis_routes() -> Router<AppState> {
    Router::new().route("/diagnose", post(handler::diagnose_handler))
}
