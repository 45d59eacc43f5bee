//! Nullable infrastructure for deterministic testing.
//!
//! Every host capability the ledger needs (ordered storage, token movements,
//! data proxy configuration) has an in-memory implementation here that:
//! - Returns deterministic values
//! - Can be controlled programmatically
//! - Never touches the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and in the replay
//! daemon.

pub mod bank;
pub mod data_proxy;
pub mod store;

pub use bank::NullBank;
pub use data_proxy::NullDataProxyDirectory;
pub use store::NullKvStore;
