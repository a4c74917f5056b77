// X-ray imaging route definitions

use axum::{routing::post, Router};

use super::handler;
use crate::config::state::AppState;

pub fn imaging_routes() -> Router<AppState> {
    Router::new().route("/xray/analyze", post(handler::analyze_xray_handler))
}
