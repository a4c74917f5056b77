//! tests/global_errors/408.rs
//! Ensures that requests outliving the configured timeout return 408.

#[path = "../mod.rs"]
mod common;

use axum::{routing::post, Json, Router};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// A translation backend that answers, but far too slowly.
async fn slow_translate() -> Json<Value> {
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    Json(json!({ "predictions": [{ "translated_text": "too late" }] }))
}

#[tokio::test]
async fn returns_408_when_backend_outlives_timeout() {
    let stub_url: String = common::spawn_router(Router::new().route("/", post(slow_translate)));

    let mut env = common::test_env(&stub_url);
    env.default_timeout_seconds = 1;

    let base_url: String = common::spawn_app(env);

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/translate", base_url))
        .json(&json!({
            "text": "hello",
            "source_language": "english",
            "target_language": "german",
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);

    let body: String = resp.text().await.unwrap();
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "REQUEST_TIMEOUT");
    assert_eq!(json["code"], 408);
}
