//! The host application: one keeper wired to a store, a bank and a data
//! proxy directory.

use std::path::Path;

use fast_engine::{
    EligibilityResponse, Executed, GenesisState, Keeper, Msg, PageRequest, UsersPage,
};
use fast_nullables::{NullBank, NullDataProxyDirectory, NullKvStore};
use fast_store::KvStore;
use fast_types::{AccountAddress, BankKeeper, DataProxyDirectory, FastClient, FastUser, Params, PubKey};
use tracing::{info, warn};

use crate::config::NodeConfig;
use crate::event_bus::EventBus;
use crate::NodeError;

/// An application over in-memory host capabilities.
pub type InMemoryApp = FastApp<NullKvStore, NullBank, NullDataProxyDirectory>;

pub struct FastApp<S, B, P> {
    keeper: Keeper,
    store: S,
    bank: B,
    proxies: P,
    height: u64,
    events: EventBus,
}

impl InMemoryApp {
    /// Build an empty in-memory application from `config`.
    pub fn in_memory(config: &NodeConfig) -> Self {
        Self::new(
            Keeper::new(config.authority, config.chain_id.clone()),
            NullKvStore::new(),
            NullBank::new(config.bond_denom.clone()),
            NullDataProxyDirectory::new(),
        )
    }
}

impl<S, B, P> FastApp<S, B, P>
where
    S: KvStore,
    B: BankKeeper,
    P: DataProxyDirectory,
{
    pub fn new(keeper: Keeper, store: S, bank: B, proxies: P) -> Self {
        Self {
            keeper,
            store,
            bank,
            proxies,
            height: 0,
            events: EventBus::new(),
        }
    }

    pub fn keeper(&self) -> &Keeper {
        &self.keeper
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    pub fn proxies(&self) -> &P {
        &self.proxies
    }

    pub fn proxies_mut(&mut self) -> &mut P {
        &mut self.proxies
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// Load `genesis` into the store. Fails without writing if it does not
    /// validate.
    pub fn init_chain(&mut self, genesis: &GenesisState) -> Result<(), NodeError> {
        self.keeper.init_genesis(&mut self.store, genesis)?;
        info!(
            chain_id = self.keeper.chain_id(),
            clients = genesis.fast_clients.len(),
            users = genesis.fast_users.len(),
            "chain initialised"
        );
        Ok(())
    }

    /// Load a JSON genesis file and initialise the chain from it.
    pub fn init_chain_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), NodeError> {
        let genesis = read_genesis_file(path)?;
        self.init_chain(&genesis)
    }

    /// Advance to `height`. Heights never go backwards.
    pub fn begin_block(&mut self, height: u64) -> Result<(), NodeError> {
        if height < self.height {
            return Err(NodeError::Config(format!(
                "block height {height} is below current height {}",
                self.height
            )));
        }
        self.height = height;
        Ok(())
    }

    /// Execute one message and publish its events to subscribers.
    pub fn deliver(&mut self, msg: &Msg) -> Result<Executed, NodeError> {
        match self
            .keeper
            .execute(&mut self.store, &mut self.bank, &self.proxies, msg)
        {
            Ok(executed) => {
                for event in &executed.events {
                    self.events.emit(event);
                }
                Ok(executed)
            }
            Err(e) => {
                warn!(height = self.height, msg = msg.type_name(), code = e.code(), "tx failed");
                Err(e.into())
            }
        }
    }

    pub fn export(&self) -> Result<GenesisState, NodeError> {
        Ok(self.keeper.export_genesis(&self.store)?)
    }

    pub fn params(&self) -> Result<Params, NodeError> {
        Ok(self.keeper.query_params(&self.store)?)
    }

    pub fn fast_client(&self, public_key: &PubKey) -> Result<FastClient, NodeError> {
        Ok(self.keeper.query_fast_client(&self.store, public_key)?)
    }

    pub fn fast_client_transfer(&self, public_key: &PubKey) -> Result<AccountAddress, NodeError> {
        Ok(self.keeper.query_fast_client_transfer(&self.store, public_key)?)
    }

    pub fn fast_client_user(&self, public_key: &PubKey, user_id: &str) -> Result<FastUser, NodeError> {
        Ok(self
            .keeper
            .query_fast_client_user(&self.store, public_key, user_id)?)
    }

    pub fn fast_client_users(
        &self,
        public_key: &PubKey,
        page: &PageRequest,
    ) -> Result<UsersPage, NodeError> {
        Ok(self
            .keeper
            .query_fast_client_users(&self.store, public_key, page)?)
    }

    /// Eligibility check answered at the current block height.
    pub fn fast_client_eligibility(&self, payload: &str) -> Result<EligibilityResponse, NodeError> {
        Ok(self
            .keeper
            .query_fast_client_eligibility(&self.store, payload, self.height)?)
    }
}

/// Read and validate a JSON genesis file.
pub fn read_genesis_file(path: impl AsRef<Path>) -> Result<GenesisState, NodeError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let genesis: GenesisState = serde_json::from_str(&content)
        .map_err(|e| NodeError::Genesis(format!("{}: {e}", path.display())))?;
    genesis.validate()?;
    Ok(genesis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights_never_go_backwards() {
        let mut app = InMemoryApp::in_memory(&NodeConfig::default());
        app.begin_block(5).unwrap();
        app.begin_block(5).unwrap();
        assert!(app.begin_block(4).is_err());
        assert_eq!(app.height(), 5);
    }

    #[test]
    fn invalid_genesis_leaves_store_empty() {
        let mut app = InMemoryApp::in_memory(&NodeConfig::default());
        let genesis = GenesisState {
            starting_fast_client_id: 0,
            fast_clients: vec![FastClient {
                id: 3,
                owner_address: AccountAddress::new([1; 20]),
                admin_address: AccountAddress::new([2; 20]),
                settlement_address: AccountAddress::new([3; 20]),
                public_key: PubKey::new(vec![2; 33]),
                memo: String::new(),
                balance: fast_types::Amount::ZERO,
                used_credits: fast_types::Amount::ZERO,
            }],
            ..GenesisState::default_genesis()
        };
        assert!(app.init_chain(&genesis).is_err());
        assert!(app.store().is_empty());
    }
}
