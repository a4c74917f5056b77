// Translation route definitions

use axum::{routing::post, Router};

use super::handler;
use crate::config::state::AppState;

pub fn translation_routes() -> Router<AppState> {
    Router::new().route("/translate", post(handler::translate_handler))
}
