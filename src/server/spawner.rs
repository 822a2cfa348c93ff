// src/server/spawner.rs

//! Spawns the server's long-running tasks.

use super::context::ServerContext;
use super::metrics_server;
use anyhow::Result;
use tracing::info;

/// Spawns the HTTP server and, if enabled, the metrics exporter into the JoinSet.
pub fn spawn_all(ctx: ServerContext) -> Result<super::ServerHandle> {
    let ServerContext {
        config,
        app,
        listener,
        shutdown_tx,
        mut background_tasks,
    } = ctx;

    // --- Metrics Server ---
    if config.metrics.enabled {
        let shutdown_rx_metrics = shutdown_tx.subscribe();
        let host = config.host.clone();
        let port = config.metrics.port;
        background_tasks.spawn(async move {
            metrics_server::run_metrics_server(host, port, shutdown_rx_metrics).await
        });
    } else {
        info!("Prometheus metrics server is disabled in the configuration.");
    }

    // --- Action Server ---
    let mut shutdown_rx_http = shutdown_tx.subscribe();
    background_tasks.spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_rx_http.recv().await.ok();
                info!("Action server shutting down.");
            })
            .await?;
        Ok(())
    });

    Ok(super::ServerHandle {
        shutdown_tx,
        background_tasks,
    })
}
