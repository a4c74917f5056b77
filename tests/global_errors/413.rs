//! tests/global_errors/413.rs
//! Ensures that oversized request bodies return HTTP 413.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn returns_413_for_oversized_body() {
    let mut env = common::test_env("http://127.0.0.1:9");
    env.max_request_body_size = 1024; // 1KB limit for the test

    let base_url: String = common::spawn_app(env);

    // Clinical notes well past the configured body limit.
    let notes: String = "fever ".repeat(2048);

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/diagnose", base_url))
        .json(&json!({ "notes": notes }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
