//! Ledger errors. Any of these aborts the current invocation.

use thiserror::Error;

use crate::identity::{Amount, Identity};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient balance of token: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Insufficient approved token: have {have}, need {need}")]
    InsufficientAllowance { have: Amount, need: Amount },

    #[error("Amount too low: {amount} is below the minimum deposit of {minimum}")]
    AmountTooLow { amount: Amount, minimum: Amount },

    #[error("Value does not match the amount sent: attached {attached}, required {required}")]
    ValueMismatch { attached: Amount, required: Amount },

    #[error("External call {method} failed: {reason}")]
    ExternalCallFailed { method: String, reason: String },

    #[error("External call {method} returned an unexpected value")]
    UnexpectedReturn { method: String },

    #[error("Unauthorized: {0} is not the owner")]
    Unauthorized(Identity),

    #[error("Total supply is zero, rewards cannot be distributed")]
    ZeroSupply,

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LedgerError {
    pub fn call_failed(method: &str, reason: impl Into<String>) -> Self {
        LedgerError::ExternalCallFailed {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    pub fn overflow(what: &str) -> Self {
        LedgerError::InvalidAmount(format!("{what} overflows"))
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
