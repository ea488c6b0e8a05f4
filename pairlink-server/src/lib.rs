mod config;
mod room;
mod signaling;

pub use config::*;
pub use room::*;
pub use signaling::*;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// `GET /ws` upgrades to the signaling socket.
pub fn router(service: SignalingService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(service)
}

pub async fn serve<F>(config: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    serve_on(listener, shutdown).await
}

/// Runs the server on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Signaling server listening on ws://{}/ws", addr);

    axum::serve(listener, router(SignalingService::new()))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Signaling server failed")?;

    info!("Signaling server stopped");
    Ok(())
}
