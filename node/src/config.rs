//! Host configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use fast_types::address::ADDRESS_LEN;
use fast_types::AccountAddress;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a Fast Client host.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Chain identifier mixed into eligibility signatures.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,

    /// Governance account allowed to register clients and update params.
    #[serde(default = "default_authority")]
    pub authority: AccountAddress,

    /// Denomination used for escrow, payouts and settlement.
    #[serde(default = "default_bond_denom")]
    pub bond_denom: String,

    /// Genesis file (JSON). The default genesis is used when absent.
    #[serde(default)]
    pub genesis_file: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain_id() -> String {
    "fast-local-1".to_string()
}

fn default_authority() -> AccountAddress {
    AccountAddress::new([0u8; ADDRESS_LEN])
}

fn default_bond_denom() -> String {
    "stake".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        if self.chain_id.is_empty() {
            return Err(NodeError::Config("chain_id must not be empty".into()));
        }
        if self.bond_denom.is_empty() {
            return Err(NodeError::Config("bond_denom must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            authority: default_authority(),
            bond_denom: default_bond_denom(),
            genesis_file: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
