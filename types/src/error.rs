//! Validation errors for the ledger's value types.

use thiserror::Error;

/// Errors raised while parsing or validating ledger values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("public key must not be empty")]
    EmptyPublicKey,

    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("user id is {len} bytes, limit is {max}")]
    UserIdTooLong { len: usize, max: u32 },

    #[error("memo is {len} bytes, limit is {max}")]
    MemoTooLong { len: usize, max: u32 },

    #[error("used credits {used} exceed balance {balance}")]
    UsedCreditsExceedBalance { used: u128, balance: u128 },

    #[error("insufficient credits: need {needed}, have {available}")]
    InsufficientCredits { needed: u128, available: u128 },

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("invalid params: {0}")]
    InvalidParams(String),
}
