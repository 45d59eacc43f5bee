//! Fundamental types for the Fast Client credit ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, public keys, amounts, client and user records, module
//! parameters, and the host capabilities (bank, data proxy directory) the
//! ledger is driven against.

pub mod address;
pub mod amount;
pub mod client;
pub mod error;
pub mod host;
pub mod params;
pub mod pubkey;

pub use address::AccountAddress;
pub use amount::Amount;
pub use client::{FastClient, FastClientTransferOwnership, FastUser, UserWithFastClientId};
pub use error::ValidationError;
pub use host::{BankError, BankKeeper, Coin, DataProxyConfig, DataProxyDirectory, Holder};
pub use params::Params;
pub use pubkey::PubKey;
