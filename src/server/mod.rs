// src/server/mod.rs

use crate::config::Config;
use anyhow::Result;
use tokio::sync::broadcast;
use tokio::task::JoinSet;

mod connection_loop;
mod context;
pub mod envelope;
pub mod initialization;
mod metrics_server;
pub mod routes;
mod spawner;

pub use routes::{AppState, router};

/// The running tasks and the channel used to stop them.
pub struct ServerHandle {
    pub shutdown_tx: broadcast::Sender<()>,
    pub background_tasks: JoinSet<Result<(), anyhow::Error>>,
}

/// The main server startup function, orchestrating all setup phases.
pub async fn run(config: Config) -> Result<()> {
    // 1. Build the ledger client, router and listener.
    let server_context = initialization::setup(config).await?;

    // 2. Spawn the action server and the metrics exporter.
    let handle = spawner::spawn_all(server_context)?;

    // 3. Run until a signal or a task failure triggers shutdown.
    connection_loop::run(handle).await
}
