//! Fast Client host harness.
//!
//! Wires the ledger keeper to a key-value store, a bank and a data proxy
//! directory, and provides:
//! - TOML configuration ([`NodeConfig`])
//! - Structured logging ([`init_logging`])
//! - Committed-event fan-out ([`EventBus`])
//! - Replay of JSON transaction files ([`replay()`])

pub mod app;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod logging;
pub mod replay;

pub use app::{read_genesis_file, FastApp, InMemoryApp};
pub use config::NodeConfig;
pub use error::NodeError;
pub use event_bus::EventBus;
pub use logging::{init_logging, LogFormat};
pub use replay::{replay, ReplayFile, TxOutcome};
