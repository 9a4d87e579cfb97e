//! HTTP server command.

use anyhow::{Context as _, Result};
use shopfront_cli::server::{router, AppState};

use super::ServeArgs;
use crate::context::Context;

/// Run the serve command.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    let mut server = ctx.config.server.clone();
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }

    let state = AppState::from_config(&ctx.config).context("Failed to build API client")?;
    let addr = server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(%addr, api = %ctx.config.api.base_url, "storefront listening");
    ctx.output.success(&format!("Listening on http://{}", addr));

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("storefront stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
