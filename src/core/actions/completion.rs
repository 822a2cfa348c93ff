// src/core/actions/completion.rs

//! Verifies the signature of the chain's last transaction and ends the chain.
//!
//! A callback moves through `validating -> status-checking -> transaction-fetch`
//! and ends `completed` or `rejected`. Nothing is retried here: a rejected
//! client re-submits the same `(account, signature)` later, and the check is
//! repeated against the ledger from scratch.

use super::{ActionContext, parse_account, parse_signature};
use crate::core::errors::{ActionChainError, VerificationFailure};
use crate::core::ledger::{Commitment, Ledger, ParsedTransaction, SignatureStatus};
use crate::core::protocol::{ActionResponse, CompletedAction, NextActionPostRequest};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::fmt;
use tracing::{debug, info, warn};
use url::Url;

const COMPLETED_ICON_PATH: &str = "/solana_devs.jpg";

/// Processing stages of a completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStage {
    Validating,
    StatusChecking,
    TransactionFetch,
    Completed,
    Rejected,
}

impl ChainStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainStage::Validating => "validating",
            ChainStage::StatusChecking => "status-checking",
            ChainStage::TransactionFetch => "transaction-fetch",
            ChainStage::Completed => "completed",
            ChainStage::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ChainStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated completion callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmChain {
    account: Pubkey,
    signature: Signature,
}

impl ConfirmChain {
    /// Validates `account` first, then `signature`.
    pub fn validate(request: &NextActionPostRequest) -> Result<Self, ActionChainError> {
        let account = parse_account(request.account.as_deref())?;
        let signature = parse_signature(request.signature.as_deref())?;
        Ok(Self { account, signature })
    }

    pub fn account(&self) -> &Pubkey {
        &self.account
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Requires the ledger to report the signature at `confirmed` or `finalized`.
    ///
    /// A status without a `confirmationStatus` is accepted. Any ledger failure is
    /// folded into `VerificationFailure::Unreachable`.
    pub async fn check_status(
        &self,
        ledger: &dyn Ledger,
    ) -> Result<SignatureStatus, ActionChainError> {
        let status = match ledger.get_signature_status(&self.signature).await {
            Ok(status) => status,
            Err(e) => {
                warn!(signature = %self.signature, "Signature status query failed: {}", e);
                return Err(ActionChainError::Verification(
                    VerificationFailure::Unreachable,
                ));
            }
        };
        debug!(signature = %self.signature, ?status, "Signature status");

        let status = status.ok_or(ActionChainError::Verification(
            VerificationFailure::UnknownStatus,
        ))?;

        if status
            .confirmation_status
            .is_some_and(|level| !level.is_confirmed())
        {
            return Err(ActionChainError::Verification(
                VerificationFailure::Unconfirmed,
            ));
        }

        if let Some(err) = &status.err {
            warn!(signature = %self.signature, %err, "Chained transaction landed with an error");
        }
        Ok(status)
    }

    /// Fetches the confirmed transaction. The result is informational only.
    pub async fn fetch_transaction(
        &self,
        ledger: &dyn Ledger,
    ) -> Result<Option<ParsedTransaction>, ActionChainError> {
        let transaction = ledger
            .get_parsed_transaction(&self.signature, Commitment::Confirmed)
            .await?;
        match &transaction {
            Some(tx) => debug!(
                signature = %self.signature,
                slot = tx.slot,
                block_time = ?tx.block_time,
                "Fetched chained transaction"
            ),
            None => debug!(signature = %self.signature, "Chained transaction not yet available"),
        }
        Ok(transaction)
    }

    /// The terminal response, embedding the verified signature.
    pub fn completed(&self, origin: &Url) -> Result<CompletedAction, ActionChainError> {
        let icon = origin
            .join(COMPLETED_ICON_PATH)
            .map_err(|e| ActionChainError::Internal(format!("Failed to build icon url: {e}")))?;
        Ok(CompletedAction {
            title: "Chaining was successful!".to_string(),
            icon: icon.to_string(),
            label: "Complete!".to_string(),
            description: format!(
                "You have now completed an action chain! \
                 Here was the signature from the last action's transaction: {} ",
                self.signature
            ),
        })
    }
}

/// Runs the full completion pipeline on a raw request body.
pub async fn handle_next_action(
    ctx: &ActionContext,
    body: &[u8],
    origin: &Url,
) -> Result<ActionResponse, ActionChainError> {
    let mut stage = ChainStage::Validating;
    let result = confirm_chain(ctx, body, origin, &mut stage).await;

    match &result {
        Ok(_) => debug!(from = %stage, to = %ChainStage::Completed, "Chain callback finished"),
        Err(e) => info!(at = %stage, to = %ChainStage::Rejected, "Chain callback rejected: {}", e),
    }
    result
}

async fn confirm_chain(
    ctx: &ActionContext,
    body: &[u8],
    origin: &Url,
    stage: &mut ChainStage,
) -> Result<ActionResponse, ActionChainError> {
    let request: NextActionPostRequest = serde_json::from_slice(body)?;
    debug!(?request, "Received chain callback");
    let chain = ConfirmChain::validate(&request)?;

    *stage = ChainStage::StatusChecking;
    chain.check_status(ctx.ledger.as_ref()).await?;

    *stage = ChainStage::TransactionFetch;
    chain.fetch_transaction(ctx.ledger.as_ref()).await?;

    chain.completed(origin).map(ActionResponse::Completed)
}
