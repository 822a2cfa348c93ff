// src/core/actions/mod.rs

//! The memo action chain: describe, build an unsigned transaction, confirm its signature.
//!
//! None of the handlers keep state between requests. The only thing linking the
//! build step to the completion step is the public `links.next` href returned to
//! the client; the completion step rebuilds its context from the submitted
//! signature and the ledger.

pub mod builder;
pub mod completion;
pub mod descriptor;

use crate::core::errors::{ActionChainError, InputField};
use crate::core::ledger::Ledger;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use std::sync::Arc;

pub use builder::PostMemo;
pub use completion::{ChainStage, ConfirmChain};
pub use descriptor::{actions_manifest, memo_action};

/// Route of the descriptor (GET) and transaction builder (POST).
pub const ACTION_PATH: &str = "/api/actions/post-chaining";

/// Route of the chain-completion callback.
pub const NEXT_ACTION_PATH: &str = "/api/actions/post-chaining/next-action";

/// Route of the Solana Actions path mapping document.
pub const ACTIONS_MANIFEST_PATH: &str = "/actions.json";

/// Everything a handler needs besides the request itself. Cheap to clone.
#[derive(Clone)]
pub struct ActionContext {
    pub ledger: Arc<dyn Ledger>,
    /// Priority fee, in micro-lamports per compute unit, added to built transactions.
    pub compute_unit_price: u64,
}

impl ActionContext {
    pub fn new(ledger: Arc<dyn Ledger>, compute_unit_price: u64) -> Self {
        Self {
            ledger,
            compute_unit_price,
        }
    }
}

/// Parses the `account` field of a request.
pub fn parse_account(account: Option<&str>) -> Result<Pubkey, ActionChainError> {
    account
        .and_then(|s| Pubkey::from_str(s).ok())
        .ok_or(ActionChainError::Validation(InputField::Account))
}

/// Parses the `signature` field of a completion callback.
pub fn parse_signature(signature: Option<&str>) -> Result<Signature, ActionChainError> {
    signature
        .filter(|s| !s.is_empty())
        .and_then(|s| Signature::from_str(s).ok())
        .ok_or(ActionChainError::Validation(InputField::Signature))
}
