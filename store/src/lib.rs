//! Storage for the Fast Client ledger.
//!
//! Backends implement [`KvStore`]. The ledger only ever talks to the typed
//! collections in [`schema`], usually through a [`StagedStore`] so that a
//! failed call leaves the backend untouched.

pub mod collections;
pub mod error;
pub mod kv;
pub mod schema;
pub mod staged;

pub use collections::{Item, KeyCodec, Map, Sequence};
pub use error::StoreError;
pub use kv::{KvPairs, KvStore};
pub use schema::LedgerSchema;
pub use staged::StagedStore;
