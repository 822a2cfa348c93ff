// src/core/ledger/mod.rs

//! The ledger queries the action handlers depend on.
//!
//! Handlers only see the [`Ledger`] trait, so the JSON-RPC implementation in
//! [`rpc`] can be swapped for a scripted one in tests.

pub mod rpc;

use crate::core::errors::LedgerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;

pub use rpc::RpcLedger;

/// Commitment levels, also reported as a signature's `confirmationStatus`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }

    /// True for `confirmed` and `finalized`, the levels a chain may advance on.
    pub fn is_confirmed(&self) -> bool {
        *self >= Commitment::Confirmed
    }
}

/// The most recent blockhash and the last block height at which it stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBlockhash {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Processing status of a single signature as reported by `getSignatureStatuses`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    /// `None` once the transaction is rooted.
    #[serde(default)]
    pub confirmations: Option<u64>,
    /// The transaction error, if the transaction failed.
    #[serde(default)]
    pub err: Option<Value>,
    /// Older nodes may omit this field.
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

/// A transaction fetched with `jsonParsed` encoding. Only the fields logged by
/// the completion handler are typed; the rest is kept as raw JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub transaction: Value,
}

/// Read access to the ledger.
///
/// Every method may fail with a transport-level `LedgerError`; callers decide how
/// that failure is reported to the client.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, LedgerError>;

    /// Returns `None` when the ledger has no record of `signature`.
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, LedgerError>;

    /// Returns `None` when the transaction is not available at `commitment`.
    async fn get_parsed_transaction(
        &self,
        signature: &Signature,
        commitment: Commitment,
    ) -> Result<Option<ParsedTransaction>, LedgerError>;
}
