// Transcription route definitions

use axum::{routing::post, Router};

use super::handler;
use crate::config::state::AppState;

pub fn transcription_routes() -> Router<AppState> {
    Router::new().route("/transcribe", post(handler::transcribe_handler))
}
