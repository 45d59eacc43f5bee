//! Capabilities supplied by the host chain.
//!
//! The ledger never owns tokens directly. It asks a [`BankKeeper`] to move
//! coins between accounts and the module escrow, and reads data proxy payout
//! configuration from a [`DataProxyDirectory`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::address::AccountAddress;
use crate::amount::Amount;
use crate::pubkey::PubKey;

/// An amount of a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Amount,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Something that can hold tokens: an account or the module escrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Holder {
    Account(AccountAddress),
    Escrow,
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holder::Account(addr) => write!(f, "{addr}"),
            Holder::Escrow => f.write_str("escrow"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("insufficient funds in {holder}: need {needed}, have {available} {denom}")]
    InsufficientFunds {
        holder: String,
        denom: String,
        needed: u128,
        available: u128,
    },

    #[error("balance overflow for {0}")]
    Overflow(String),
}

/// Token movements the ledger needs from the host.
pub trait BankKeeper {
    /// The staking denomination all escrow and payouts are made in.
    fn bond_denom(&self) -> String;

    fn balance(&self, holder: &Holder, denom: &str) -> Amount;

    fn send_to_escrow(&mut self, from: &AccountAddress, coin: &Coin) -> Result<(), BankError>;

    fn send_from_escrow(&mut self, to: &AccountAddress, coin: &Coin) -> Result<(), BankError>;

    fn burn_from_escrow(&mut self, coin: &Coin) -> Result<(), BankError>;
}

/// Payout configuration of a data proxy, owned by a separate module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataProxyConfig {
    /// Unvalidated address text; may fail to parse.
    pub payout_address: String,
    /// Price per unit of usage.
    pub price: Amount,
}

/// Read-only lookup of data proxy configuration.
pub trait DataProxyDirectory {
    fn get_config(&self, pubkey: &PubKey) -> Option<DataProxyConfig>;
}
