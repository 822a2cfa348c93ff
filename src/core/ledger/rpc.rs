// src/core/ledger/rpc.rs

//! A `Ledger` backed by a Solana JSON-RPC endpoint.

use super::{Commitment, LatestBlockhash, Ledger, ParsedTransaction, SignatureStatus};
use crate::config::LedgerConfig;
use crate::core::errors::LedgerError;
use crate::core::metrics;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[derive(Deserialize, Debug)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize, Debug)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// The `{context, value}` wrapper used by most Solana RPC methods.
#[derive(Deserialize, Debug)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
    last_valid_block_height: u64,
}

/// JSON-RPC client for the three queries the action handlers need.
///
/// Each call is bounded by the configured timeout. The client holds no
/// per-request state, so one instance is shared by all handlers.
pub struct RpcLedger {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    search_transaction_history: bool,
    next_id: AtomicU64,
}

impl RpcLedger {
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let endpoint = Url::parse(&config.rpc_url)
            .map_err(|e| LedgerError::Transport(format!("invalid RPC url '{}': {e}", config.rpc_url)))?;
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            timeout: config.timeout,
            search_transaction_history: config.search_transaction_history,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one JSON-RPC request and decodes its `result` as `T`.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let timer = metrics::LEDGER_LATENCY_SECONDS
            .with_label_values(&[method])
            .start_timer();
        let outcome = match tokio::time::timeout(self.timeout, self.send(method, &request)).await {
            Ok(res) => res,
            Err(_) => Err(LedgerError::Timeout { method }),
        };
        timer.observe_duration();

        let result = outcome.and_then(|response| {
            if let Some(err) = response.error {
                return Err(LedgerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            debug!(method, result = %response.result, "RPC response");
            serde_json::from_value::<T>(response.result).map_err(LedgerError::from)
        });

        let label = if result.is_ok() { "ok" } else { "error" };
        metrics::LEDGER_REQUESTS_TOTAL
            .with_label_values(&[method, label])
            .inc();
        if let Err(e) = &result {
            warn!(method, "Ledger request failed: {}", e);
        }
        result
    }

    async fn send(&self, method: &'static str, request: &Value) -> Result<RpcResponse, LedgerError> {
        let res = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| LedgerError::from_reqwest(method, e))?;

        if !res.status().is_success() {
            return Err(LedgerError::Transport(format!(
                "RPC endpoint responded with status {}",
                res.status()
            )));
        }

        res.json::<RpcResponse>()
            .await
            .map_err(|e| LedgerError::from_reqwest(method, e))
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, LedgerError> {
        let response: WithContext<BlockhashValue> = self.call("getLatestBlockhash", json!([])).await?;
        let blockhash = Hash::from_str(&response.value.blockhash).map_err(|e| {
            LedgerError::InvalidResponse(format!(
                "malformed blockhash '{}': {e}",
                response.value.blockhash
            ))
        })?;
        Ok(LatestBlockhash {
            blockhash,
            last_valid_block_height: response.value.last_valid_block_height,
        })
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, LedgerError> {
        let params = json!([
            [signature.to_string()],
            { "searchTransactionHistory": self.search_transaction_history },
        ]);
        let response: WithContext<Vec<Option<SignatureStatus>>> =
            self.call("getSignatureStatuses", params).await?;
        Ok(response.value.into_iter().next().flatten())
    }

    async fn get_parsed_transaction(
        &self,
        signature: &Signature,
        commitment: Commitment,
    ) -> Result<Option<ParsedTransaction>, LedgerError> {
        let params = json!([
            signature.to_string(),
            {
                "encoding": "jsonParsed",
                "commitment": commitment.as_str(),
                "maxSupportedTransactionVersion": 0,
            },
        ]);
        self.call("getTransaction", params).await
    }
}
