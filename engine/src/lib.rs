//! The Fast Client credit ledger.
//!
//! Clients deposit tokens into the module escrow and hand out prepaid
//! credits to their users. Usage is reported in batches by the client's
//! settlement address; the part of the usage owed to data proxies is paid
//! out immediately, the rest accumulates as the client's used credits until
//! it is burned or withdrawn.
//!
//! All state transitions go through [`Keeper::execute`], which applies a
//! message atomically against any [`fast_store::KvStore`],
//! [`fast_types::BankKeeper`] and [`fast_types::DataProxyDirectory`].

pub mod bank;
pub mod error;
pub mod events;
pub mod genesis;
pub mod keeper;
pub mod msg_server;
pub mod msgs;
pub mod ownership;
pub mod query;
pub mod registry;
pub mod settlement;
pub mod users;

pub use error::FastError;
pub use events::FastEvent;
pub use genesis::GenesisState;
pub use keeper::Keeper;
pub use msg_server::Executed;
pub use msgs::{Msg, MsgResponse, SettleType};
pub use query::{EligibilityResponse, PageRequest, PageResponse, UsersPage};
