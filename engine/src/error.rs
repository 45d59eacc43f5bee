//! Ledger errors and their stable codes.

use fast_store::StoreError;
use fast_types::{BankError, ValidationError};
use thiserror::Error;

/// Codespace every [`FastError`] code belongs to.
pub const CODESPACE: &str = "fast";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FastError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("insufficient credits: {0}")]
    InsufficientCredits(String),

    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("bank error: {0}")]
    Bank(#[from] BankError),
}

impl FastError {
    /// Stable numeric code within [`CODESPACE`].
    pub fn code(&self) -> u32 {
        match self {
            FastError::Unauthorized(_) => 2,
            FastError::NotFound(_) => 3,
            FastError::AlreadyExists(_) => 4,
            FastError::InsufficientCredits(_) => 5,
            FastError::InsufficientBalance(_) => 6,
            FastError::InvalidAddress(_) => 7,
            FastError::InvalidRequest(_) => 8,
            FastError::Overflow => 9,
            FastError::Store(_) => 10,
            FastError::Bank(_) => 11,
        }
    }

    pub fn codespace(&self) -> &'static str {
        CODESPACE
    }
}

impl From<ValidationError> for FastError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::InvalidAddress(_) => FastError::InvalidAddress(e.to_string()),
            ValidationError::InsufficientCredits { .. } => {
                FastError::InsufficientCredits(e.to_string())
            }
            ValidationError::InsufficientBalance { .. }
            | ValidationError::UsedCreditsExceedBalance { .. } => {
                FastError::InsufficientBalance(e.to_string())
            }
            ValidationError::Overflow => FastError::Overflow,
            ValidationError::InvalidPublicKey(_)
            | ValidationError::EmptyPublicKey
            | ValidationError::EmptyUserId
            | ValidationError::UserIdTooLong { .. }
            | ValidationError::MemoTooLong { .. }
            | ValidationError::InvalidParams(_) => FastError::InvalidRequest(e.to_string()),
        }
    }
}
