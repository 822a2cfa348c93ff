// src/core/transaction.rs

//! Builds the unsigned memo transaction returned to action clients.
//!
//! The server never signs or submits anything: the transaction carries zeroed
//! signature slots and is encoded in the legacy wire format so any wallet can
//! deserialize, sign and send it.

use crate::core::errors::ActionChainError;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

/// The SPL Memo (v2) program.
pub const MEMO_PROGRAM_ID: Pubkey = pubkey!("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");

/// The native compute budget program.
pub const COMPUTE_BUDGET_PROGRAM_ID: Pubkey = pubkey!("ComputeBudget111111111111111111111111111111");

/// Discriminant of `ComputeBudgetInstruction::SetComputeUnitPrice`.
const SET_COMPUTE_UNIT_PRICE_TAG: u8 = 3;

/// Maximum size of a serialized transaction accepted by the cluster.
pub const PACKET_DATA_SIZE: usize = 1232;

/// Builds a `SetComputeUnitPrice` directive with the price in micro-lamports per compute unit.
pub fn set_compute_unit_price(micro_lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(9);
    data.push(SET_COMPUTE_UNIT_PRICE_TAG);
    data.extend_from_slice(&micro_lamports.to_le_bytes());
    Instruction::new_with_bytes(COMPUTE_BUDGET_PROGRAM_ID, &data, vec![])
}

/// Builds a memo instruction carrying the UTF-8 bytes of `memo` and no account keys.
pub fn memo_instruction(memo: &str) -> Instruction {
    Instruction::new_with_bytes(MEMO_PROGRAM_ID, memo.as_bytes(), vec![])
}

/// An unsigned transaction ready to be handed to a wallet.
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    inner: Transaction,
}

impl UnsignedTransaction {
    /// Assembles `instructions` with `fee_payer` as the only required signer.
    pub fn new(instructions: &[Instruction], fee_payer: &Pubkey, recent_blockhash: Hash) -> Self {
        let mut inner = Transaction::new_with_payer(instructions, Some(fee_payer));
        inner.message.recent_blockhash = recent_blockhash;
        Self { inner }
    }

    /// The compute-price + memo transaction posted by the memo action.
    pub fn memo(
        fee_payer: &Pubkey,
        memo: &str,
        compute_unit_price: u64,
        recent_blockhash: Hash,
    ) -> Self {
        Self::new(
            &[set_compute_unit_price(compute_unit_price), memo_instruction(memo)],
            fee_payer,
            recent_blockhash,
        )
    }

    /// Replaces the recent blockhash. The message layout is unaffected.
    pub fn with_recent_blockhash(mut self, recent_blockhash: Hash) -> Self {
        self.inner.message.recent_blockhash = recent_blockhash;
        self
    }

    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.inner.message.account_keys.first()
    }

    pub fn recent_blockhash(&self) -> &Hash {
        &self.inner.message.recent_blockhash
    }

    pub fn transaction(&self) -> &Transaction {
        &self.inner
    }

    /// Serializes to the legacy wire format with empty signature slots.
    pub fn serialize(&self) -> Result<Vec<u8>, ActionChainError> {
        let bytes = bincode::serde::encode_to_vec(&self.inner, bincode::config::legacy())?;
        if bytes.len() > PACKET_DATA_SIZE {
            return Err(ActionChainError::Internal(format!(
                "transaction is {} bytes, exceeding the {PACKET_DATA_SIZE} byte packet limit",
                bytes.len()
            )));
        }
        Ok(bytes)
    }

    /// Serializes and base64-encodes the transaction for an `ActionPostResponse`.
    pub fn to_base64(&self) -> Result<String, ActionChainError> {
        Ok(BASE64.encode(self.serialize()?))
    }
}
