//! `serve` command handler.

use saga::{ApiState, SagaConfig, SagaResult, build_registry, serve};

/// Serve the HTTP API until Ctrl-C.
pub async fn run_serve(
    mut config: SagaConfig,
    host: Option<String>,
    port: Option<u16>,
) -> SagaResult<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr = config.server.socket_addr()?;
    let registry = build_registry(&config)?;

    tracing::info!(
        %addr,
        model = %config.gateway.model,
        max_turns = config.narrative.max_turns(),
        "Starting story server. Press Ctrl+C to stop."
    );

    serve(addr, ApiState::new(registry)).await?;
    Ok(())
}
