use anyhow::Result;
use axum::{serve, Router};
use tokio::net::TcpListener;
use tracing::{info, warn};

use triage_gateway::config::state::AppState;
use triage_gateway::core::{logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();

    let state: AppState = AppState::from_env()?;

    // Warm up the triage store so connection problems show up in the
    // logs at startup; inference routes work without it either way.
    if let Err(e) = state.database.initialize().await {
        warn!("Triage store unavailable at startup: {:#}", e);
    }

    let app: Router = server::create_app(state.clone());
    let listener: TcpListener = server::setup_listener(&state).await?;

    info!("Server listening on: {}", listener.local_addr()?);

    serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal(state))
        .await?;

    Ok(())
}
