//! Serve loop.

use crate::{ApiState, create_router};
use saga_error::{ServerError, ServerErrorKind};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Bind `addr` and serve the story API until Ctrl-C.
///
/// # Errors
///
/// `Bind` if the socket cannot be bound, `Serve` if the loop fails.
pub async fn serve(addr: SocketAddr, state: ApiState) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            address: addr.to_string(),
            reason: e.to_string(),
        })
    })?;

    let local = listener
        .local_addr()
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;
    info!(address = %local, "Story API listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    info!("Story API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
