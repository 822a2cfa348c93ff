// src/core/actions/builder.rs

//! Builds the unsigned memo transaction for a validated POST.

use super::{ActionContext, NEXT_ACTION_PATH, parse_account};
use crate::core::errors::{ActionChainError, InputField};
use crate::core::ledger::Ledger;
use crate::core::protocol::{
    ActionPostRequest, ActionPostResponse, NextActionLink, PostResponseLinks,
};
use crate::core::transaction::UnsignedTransaction;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info};

const POST_MESSAGE: &str = "Post this memo on-chain";

/// A memo POST that passed validation and is ready to be built.
#[derive(Debug, Clone)]
pub struct PostMemo {
    account: Pubkey,
    memo: String,
    draft: UnsignedTransaction,
}

impl PostMemo {
    /// Validates the request in order: `account`, then `memo`. No I/O happens here.
    ///
    /// The transaction is laid out against a placeholder blockhash so a memo that
    /// cannot fit in a single packet is rejected before the ledger is queried.
    pub fn validate(
        request: &ActionPostRequest,
        compute_unit_price: u64,
    ) -> Result<Self, ActionChainError> {
        let account = parse_account(request.account.as_deref())?;

        let memo = request
            .memo()
            .filter(|memo| !memo.trim().is_empty())
            .ok_or(ActionChainError::Validation(InputField::Memo))?
            .to_string();

        let draft = UnsignedTransaction::memo(&account, &memo, compute_unit_price, Hash::default());
        if draft.serialize().is_err() {
            return Err(ActionChainError::Validation(InputField::Memo));
        }

        Ok(Self {
            account,
            memo,
            draft,
        })
    }

    pub fn account(&self) -> &Pubkey {
        &self.account
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Fetches a recent blockhash and returns the serialized transaction with a
    /// link to the completion route.
    pub async fn execute(self, ledger: &dyn Ledger) -> Result<ActionPostResponse, ActionChainError> {
        let latest = ledger.get_latest_blockhash().await?;
        debug!(
            blockhash = %latest.blockhash,
            last_valid_block_height = latest.last_valid_block_height,
            "Fetched recent blockhash"
        );

        let transaction = self.draft.with_recent_blockhash(latest.blockhash).to_base64()?;
        info!(account = %self.account, memo_len = self.memo.len(), "Built memo transaction");

        Ok(ActionPostResponse {
            transaction,
            message: Some(POST_MESSAGE.to_string()),
            links: Some(PostResponseLinks {
                next: NextActionLink::Post {
                    href: NEXT_ACTION_PATH.to_string(),
                },
            }),
        })
    }
}

/// Runs the full build pipeline on a raw request body.
pub async fn handle_post(
    ctx: &ActionContext,
    body: &[u8],
) -> Result<ActionPostResponse, ActionChainError> {
    let request: ActionPostRequest = serde_json::from_slice(body)?;
    debug!(?request, "Received build request");

    let post = PostMemo::validate(&request, ctx.compute_unit_price)?;
    post.execute(ctx.ledger.as_ref()).await
}
