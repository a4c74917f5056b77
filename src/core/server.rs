// Application server configuration and setup

use std::time::Duration;

use anyhow::Result;
use axum::{
    error_handling::HandleErrorLayer, extract::DefaultBodyLimit, middleware::from_fn, Router,
};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tower::{timeout::TimeoutLayer, ServiceBuilder};

use crate::api::diagnosis::routes::diagnosis_routes;
use crate::api::health::routes::health_routes;
use crate::api::imaging::routes::imaging_routes;
use crate::api::status::routes::status_routes;
use crate::api::transcription::routes::transcription_routes;
use crate::api::translation::routes::translation_routes;
use crate::api::triage::routes::triage_routes;
use crate::config::state::AppState;
use crate::utils::{error_handler::handle_global_error, response_handler::response_wrapper};

/// Creates and configures the application router with all middleware layers
pub fn create_app(state: AppState) -> Router {
    let timeout: Duration = Duration::from_secs(state.environment.default_timeout_seconds);
    let body_limit: usize = state.environment.max_request_body_size;

    Router::new()
        .merge(status_routes())
        .merge(health_routes())
        .merge(transcription_routes())
        .merge(translation_routes())
        .merge(diagnosis_routes())
        .merge(imaging_routes())
        .merge(triage_routes())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(response_wrapper))
                .layer(HandleErrorLayer::new(handle_global_error))
                .layer(TimeoutLayer::new(timeout))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Sets up the TCP listener from environment or binds to new address
pub async fn setup_listener(state: &AppState) -> Result<TcpListener> {
    let mut listenfd: ListenFd = ListenFd::from_env();

    let listener: TcpListener = match listenfd.take_tcp_listener(0)? {
        Some(std_listener) => {
            std_listener.set_nonblocking(true)?;
            TcpListener::from_std(std_listener)?
        }
        None => {
            let addr: String = format!("{}:{}", state.environment.host, state.environment.port);
            TcpListener::bind(&addr).await?
        }
    };

    Ok(listener)
}

/// Handles graceful shutdown signals (Ctrl+C and TERM)
pub async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Terminate signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate: std::future::Pending<()> = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutting down via Ctrl+C"),
        _ = terminate => tracing::info!("Shutting down via TERM signal"),
    }

    // Gracefully close database connections
    state.shutdown().await;
}
