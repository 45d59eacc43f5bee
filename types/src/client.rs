//! Client, user and pending-transfer records.
//!
//! Every mutation of a client's `balance` or `used_credits` goes through the
//! checked helpers here, which keep `used_credits <= balance`.

use serde::{Deserialize, Serialize};

use crate::address::AccountAddress;
use crate::amount::Amount;
use crate::error::ValidationError;
use crate::pubkey::PubKey;

/// A registered client: one per public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastClient {
    /// Assigned once at registration, stable across key rotation.
    pub id: u64,
    pub owner_address: AccountAddress,
    pub admin_address: AccountAddress,
    /// The only account allowed to submit usage reports.
    #[serde(rename = "address")]
    pub settlement_address: AccountAddress,
    pub public_key: PubKey,
    pub memo: String,
    /// Tokens held in escrow on behalf of this client.
    pub balance: Amount,
    /// Credits consumed but not yet paid out or settled.
    pub used_credits: Amount,
}

impl FastClient {
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.public_key.is_empty() {
            return Err(ValidationError::EmptyPublicKey);
        }
        if self.used_credits > self.balance {
            return Err(ValidationError::UsedCreditsExceedBalance {
                used: self.used_credits.raw(),
                balance: self.balance.raw(),
            });
        }
        Ok(())
    }

    /// Credit newly escrowed tokens to the client.
    pub fn deposit(&mut self, amount: Amount) -> Result<(), ValidationError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(ValidationError::Overflow)?;
        Ok(())
    }

    /// Move user credits into `used_credits` without any token movement.
    pub fn add_used_credits(&mut self, amount: Amount) -> Result<(), ValidationError> {
        let used = self
            .used_credits
            .checked_add(amount)
            .ok_or(ValidationError::Overflow)?;
        if used > self.balance {
            return Err(ValidationError::UsedCreditsExceedBalance {
                used: used.raw(),
                balance: self.balance.raw(),
            });
        }
        self.used_credits = used;
        Ok(())
    }

    /// Remove `amount` from both `used_credits` and `balance`, as when used
    /// credits are burned or withdrawn.
    pub fn settle(&mut self, amount: Amount) -> Result<(), ValidationError> {
        let used = self.used_credits.checked_sub(amount).ok_or(
            ValidationError::InsufficientCredits {
                needed: amount.raw(),
                available: self.used_credits.raw(),
            },
        )?;
        let balance =
            self.balance
                .checked_sub(amount)
                .ok_or(ValidationError::InsufficientBalance {
                    needed: amount.raw(),
                    available: self.balance.raw(),
                })?;
        self.used_credits = used;
        self.balance = balance;
        Ok(())
    }

    /// Apply the outcome of a usage report batch: `paid` left escrow for data
    /// proxies, the rest of `total_used` stays with the client as used credits.
    pub fn apply_usage(&mut self, total_used: Amount, paid: Amount) -> Result<(), ValidationError> {
        let retained = total_used
            .checked_sub(paid)
            .ok_or(ValidationError::Overflow)?;
        let balance = self
            .balance
            .checked_sub(paid)
            .ok_or(ValidationError::InsufficientBalance {
                needed: paid.raw(),
                available: self.balance.raw(),
            })?;
        let used = self
            .used_credits
            .checked_add(retained)
            .ok_or(ValidationError::Overflow)?;
        if used > balance {
            return Err(ValidationError::UsedCreditsExceedBalance {
                used: used.raw(),
                balance: balance.raw(),
            });
        }
        self.balance = balance;
        self.used_credits = used;
        Ok(())
    }
}

/// An end user of a client, holding prepaid credits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastUser {
    pub user_id: String,
    pub credits: Amount,
}

impl FastUser {
    pub fn new(user_id: impl Into<String>, credits: Amount) -> Self {
        Self {
            user_id: user_id.into(),
            credits,
        }
    }

    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.user_id.is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(())
    }

    pub fn add_credits(&mut self, amount: Amount) -> Result<(), ValidationError> {
        self.credits = self
            .credits
            .checked_add(amount)
            .ok_or(ValidationError::Overflow)?;
        Ok(())
    }

    pub fn use_credits(&mut self, amount: Amount) -> Result<(), ValidationError> {
        self.credits =
            self.credits
                .checked_sub(amount)
                .ok_or(ValidationError::InsufficientCredits {
                    needed: amount.raw(),
                    available: self.credits.raw(),
                })?;
        Ok(())
    }
}

/// Check a user id against the configured length bound.
pub fn validate_user_id(user_id: &str, max_len: u32) -> Result<(), ValidationError> {
    if user_id.is_empty() {
        return Err(ValidationError::EmptyUserId);
    }
    if user_id.len() > max_len as usize {
        return Err(ValidationError::UserIdTooLong {
            len: user_id.len(),
            max: max_len,
        });
    }
    Ok(())
}

/// Check a memo against the configured length bound.
pub fn validate_memo(memo: &str, max_len: u32) -> Result<(), ValidationError> {
    if memo.len() > max_len as usize {
        return Err(ValidationError::MemoTooLong {
            len: memo.len(),
            max: max_len,
        });
    }
    Ok(())
}

/// A user together with the id of the client it belongs to (genesis form).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithFastClientId {
    pub fast_client_id: u64,
    pub user: FastUser,
}

/// A pending ownership proposal (genesis form).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastClientTransferOwnership {
    pub fast_client_id: u64,
    pub new_owner_address: AccountAddress,
}
