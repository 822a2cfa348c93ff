// src/server/connection_loop.rs

//! Waits for a shutdown trigger and drains the running tasks.

use super::ServerHandle;
use anyhow::anyhow;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{error, info, warn};

/// How long running requests get to finish once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Blocks until SIGINT, SIGTERM or the failure of a task, then shuts everything down.
pub async fn run(mut handle: ServerHandle) -> anyhow::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow!("Failed to register SIGINT handler: {}", e))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow!("Failed to register SIGTERM handler: {}", e))?;

    let mut failure = None;
    tokio::select! {
        biased;

        _ = sigint.recv() => {
            info!("SIGINT received, initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received, initiating graceful shutdown.");
        }

        Some(res) = handle.background_tasks.join_next() => {
            match res {
                Ok(Ok(())) => warn!("A server task finished unexpectedly without an error."),
                Ok(Err(e)) => {
                    error!("CRITICAL: Server task failed: {}. Shutting down.", e);
                    failure = Some(e);
                }
                Err(e) => {
                    error!("CRITICAL: Server task panicked: {e:?}. Shutting down.");
                    failure = Some(anyhow!("server task panicked: {e}"));
                }
            }
        }
    }

    handle.shutdown_tx.send(()).ok();

    let drain = async {
        while let Some(res) = handle.background_tasks.join_next().await {
            if let Ok(Err(e)) = res {
                warn!("Task returned an error during shutdown: {}", e);
            }
        }
    };
    if tokio::time::timeout(SHUTDOWN_GRACE, drain).await.is_err() {
        warn!(
            "Tasks did not stop within {:?}; aborting them.",
            SHUTDOWN_GRACE
        );
        handle.background_tasks.abort_all();
    }
    info!("Shutdown complete.");

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
