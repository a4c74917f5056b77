//! tests/mod.rs
//! Shared test helpers: spawn the gateway on an ephemeral port and
//! stand up stub inference backends for it to talk to.

use std::borrow::Cow;

use axum::{serve, Router};
use tokio::net::TcpListener as TokioTcpListener;

use triage_gateway::config::environment::EnvironmentVariables;
use triage_gateway::config::state::AppState;
use triage_gateway::core::server::create_app;

/// Test configuration pointing every backend at `backend_url`.
/// Individual tests swap fields as needed before spawning.
pub fn test_env(backend_url: &str) -> EnvironmentVariables {
    let url = || Cow::Owned(backend_url.to_string());

    EnvironmentVariables {
        environment: Cow::Borrowed("test"),
        host: Cow::Borrowed("127.0.0.1"),
        port: 0,
        max_request_body_size: 2_097_152,
        default_timeout_seconds: 5,
        medreason_url: url(),
        medreason_token: Cow::Borrowed("test-token"),
        whisper_url: url(),
        whisper_token: Cow::Borrowed("test-token"),
        nllb_url: url(),
        nllb_token: Cow::Borrowed("test-token"),
        medgemma_url: url(),
        medgemma_token: Cow::Borrowed("test-token"),
        db_host: Cow::Borrowed("127.0.0.1"),
        db_port: 3306,
        db_user: Cow::Borrowed("root"),
        db_password: Cow::Borrowed(""),
        db_name: Cow::Borrowed("triage_test"),
    }
}

/// Spawns the gateway with the given configuration and returns its base URL.
pub fn spawn_app(env: EnvironmentVariables) -> String {
    let state: AppState = AppState::with_environment(env).expect("Failed to build AppState");
    spawn_router(create_app(state))
}

/// Spawns any router (the gateway or a stub backend) on a random
/// unused port and returns its base URL.
pub fn spawn_router(app: Router) -> String {
    let std_listener: std::net::TcpListener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    std_listener.set_nonblocking(true).unwrap();

    let tokio_listener: TokioTcpListener =
        TokioTcpListener::from_std(std_listener).expect("Failed to convert to tokio listener");

    let addr: std::net::SocketAddr = tokio_listener.local_addr().unwrap();

    tokio::spawn(async move {
        serve(tokio_listener, app).await.expect("Server failed");
    });

    format!("http://{}", addr)
}
