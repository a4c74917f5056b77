//! tests/global_errors/404.rs
//! Ensures that hitting an unknown route returns HTTP 404.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn returns_404_for_nonexistent_route() {
    // No backend is reached for an unknown route; a closed port is fine.
    let base_url: String = common::spawn_app(common::test_env("http://127.0.0.1:9"));

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/does-not-exist", base_url))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The envelope middleware wraps even router-level misses.
    let body: String = resp.text().await.unwrap();
    let json: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(json["status"], "NOT_FOUND");
    assert_eq!(json["code"], 404);
}
