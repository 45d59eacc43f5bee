//! Nullable data proxy directory.

use std::collections::BTreeMap;

use fast_types::{Amount, DataProxyConfig, DataProxyDirectory, PubKey};

/// An in-memory directory of data proxy payout configuration.
#[derive(Clone, Debug, Default)]
pub struct NullDataProxyDirectory {
    configs: BTreeMap<PubKey, DataProxyConfig>,
}

impl NullDataProxyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a proxy's payout address and price.
    pub fn register(&mut self, pubkey: PubKey, payout_address: impl Into<String>, price: Amount) {
        self.configs.insert(
            pubkey,
            DataProxyConfig {
                payout_address: payout_address.into(),
                price,
            },
        );
    }

    pub fn unregister(&mut self, pubkey: &PubKey) {
        self.configs.remove(pubkey);
    }

    pub fn with_proxy(
        mut self,
        pubkey: PubKey,
        payout_address: impl Into<String>,
        price: Amount,
    ) -> Self {
        self.register(pubkey, payout_address, price);
        self
    }
}

impl DataProxyDirectory for NullDataProxyDirectory {
    fn get_config(&self, pubkey: &PubKey) -> Option<DataProxyConfig> {
        self.configs.get(pubkey).cloned()
    }
}
