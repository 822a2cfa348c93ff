// src/server/initialization.rs

//! Builds the ledger client, the router and the listener before serving.

use super::context::ServerContext;
use super::routes::{AppState, router};
use crate::config::Config;
use crate::core::actions::ActionContext;
use crate::core::ledger::RpcLedger;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::info;
use url::Url;

/// Initializes all server components before starting the main loop.
pub async fn setup(config: Config) -> Result<ServerContext> {
    log_startup_info(&config);
    let (shutdown_tx, _) = broadcast::channel(1);

    let ledger = RpcLedger::new(&config.ledger).context("Failed to create ledger RPC client")?;
    info!("Ledger RPC client targets {}", ledger.endpoint());

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let local_addr = listener.local_addr()?;
    info!("actionchain server listening on {}", local_addr);

    let state = app_state(&config, Arc::new(ledger), &format!("http://{local_addr}"))?;
    let app = router(state, &config.action)?;

    Ok(ServerContext {
        config,
        app,
        listener,
        shutdown_tx,
        background_tasks: JoinSet::new(),
    })
}

/// Resolves the shared handler state from the configuration.
pub fn app_state(
    config: &Config,
    ledger: Arc<dyn crate::core::ledger::Ledger>,
    fallback_origin: &str,
) -> Result<AppState> {
    let public_url = config
        .public_url
        .as_deref()
        .map(Url::parse)
        .transpose()
        .context("Invalid public_url")?;
    let fallback_origin =
        Url::parse(fallback_origin).with_context(|| format!("Invalid origin '{fallback_origin}'"))?;

    Ok(AppState {
        ctx: ActionContext::new(ledger, config.action.compute_unit_price_micro_lamports),
        public_url,
        fallback_origin,
    })
}

/// Logs key configuration parameters at startup.
fn log_startup_info(config: &Config) {
    info!(
        "Compute unit price set to {} micro-lamports.",
        config.action.compute_unit_price_micro_lamports
    );
    info!(
        "Ledger calls time out after {:?}; history search is {}.",
        config.ledger.timeout,
        if config.ledger.search_transaction_history {
            "enabled"
        } else {
            "disabled"
        }
    );
    match &config.public_url {
        Some(url) => info!("Public origin: {}", url),
        None => info!("Public origin will be derived from the request Host header."),
    }
}
