// src/core/errors.rs

//! Defines the error types shared by every action handler.

use std::fmt;
use thiserror::Error;

/// The message returned to clients for any failure without a more specific description.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// The input field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Account,
    Memo,
    Signature,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::Account => "account",
            InputField::Memo => "memo",
            InputField::Signature => "signature",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a submitted signature could not be verified against the ledger.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationFailure {
    /// The ledger has no status for the signature.
    #[error("Unknown signature status")]
    UnknownStatus,
    /// The ledger knows the signature but it has not reached `confirmed` yet.
    #[error("Unable to confirm the transaction")]
    Unconfirmed,
    /// The status query itself failed. The underlying cause is logged, never returned.
    #[error("Unable to confirm the provided signature")]
    Unreachable,
}

/// Failures raised by a `Ledger` implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Ledger request '{method}' timed out")]
    Timeout { method: &'static str },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
}

impl LedgerError {
    /// Classifies a client error raised while executing the RPC `method`.
    pub fn from_reqwest(method: &'static str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LedgerError::Timeout { method }
        } else {
            LedgerError::Transport(e.to_string())
        }
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(e: reqwest::Error) -> Self {
        LedgerError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::InvalidResponse(e.to_string())
    }
}

/// The main error enum for the action handlers.
///
/// Every variant maps to exactly one client-facing `ActionError` message through
/// [`ActionChainError::client_message`]; the `Display` output is the internal
/// description used for logging.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionChainError {
    #[error("Invalid \"{0}\" provided")]
    Validation(InputField),

    #[error("{0}")]
    Verification(VerificationFailure),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Method not supported")]
    MethodNotSupported,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionChainError {
    /// The message placed in the `ActionError` body sent to the client.
    pub fn client_message(&self) -> String {
        match self {
            ActionChainError::Validation(_)
            | ActionChainError::Verification(_)
            | ActionChainError::MethodNotSupported => self.to_string(),
            ActionChainError::Ledger(_)
            | ActionChainError::MalformedBody(_)
            | ActionChainError::Internal(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }

    /// The HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ActionChainError::MethodNotSupported => 403,
            _ => 400,
        }
    }

    /// A short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionChainError::Validation(_) => "validation",
            ActionChainError::Verification(_) => "verification",
            ActionChainError::Ledger(_) => "ledger",
            ActionChainError::MalformedBody(_) => "malformed_body",
            ActionChainError::MethodNotSupported => "method_not_supported",
            ActionChainError::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for ActionChainError {
    fn from(e: serde_json::Error) -> Self {
        ActionChainError::MalformedBody(e.to_string())
    }
}

impl From<bincode::error::EncodeError> for ActionChainError {
    fn from(e: bincode::error::EncodeError) -> Self {
        ActionChainError::Internal(format!("Transaction serialization error: {e}"))
    }
}
