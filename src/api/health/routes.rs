// Backend health route definitions

use axum::{routing::get, Router};

use super::handler;
use crate::config::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health/models", get(handler::model_health_handler))
}
