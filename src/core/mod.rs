// src/core/mod.rs

//! The central module containing the action chain logic and its data structures.

pub mod actions;
pub mod errors;
pub mod ledger;
pub mod metrics;
pub mod protocol;
pub mod transaction;

pub use errors::{ActionChainError, InputField, LedgerError, VerificationFailure};
pub use ledger::Ledger;
