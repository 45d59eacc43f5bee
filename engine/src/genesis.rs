//! Import, export and validation of the full ledger state.

use std::collections::BTreeSet;

use fast_store::KvStore;
use fast_types::{FastClient, FastClientTransferOwnership, Params, UserWithFastClientId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::FastError;
use crate::keeper::Keeper;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    /// The id the next registered client will receive.
    pub starting_fast_client_id: u64,
    #[serde(default)]
    pub fast_clients: Vec<FastClient>,
    #[serde(default)]
    pub fast_users: Vec<UserWithFastClientId>,
    #[serde(default)]
    pub transfers: Vec<FastClientTransferOwnership>,
}

impl GenesisState {
    pub fn default_genesis() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), FastError> {
        let invalid = |what: String| FastError::InvalidRequest(format!("genesis: {what}"));

        let mut ids = BTreeSet::new();
        let mut keys = BTreeSet::new();
        for client in &self.fast_clients {
            client
                .validate_basic()
                .map_err(|e| invalid(format!("fast client {}: {e}", client.id)))?;
            if !ids.insert(client.id) {
                return Err(invalid(format!("duplicate fast client id {}", client.id)));
            }
            if !keys.insert(client.public_key.clone()) {
                return Err(invalid(format!(
                    "duplicate fast client public key {}",
                    client.public_key
                )));
            }
            if client.id >= self.starting_fast_client_id {
                return Err(invalid(format!(
                    "fast client id {} is not below starting id {}",
                    client.id, self.starting_fast_client_id
                )));
            }
        }

        let mut users = BTreeSet::new();
        for entry in &self.fast_users {
            entry
                .user
                .validate_basic()
                .map_err(|e| invalid(format!("fast user of client {}: {e}", entry.fast_client_id)))?;
            if !ids.contains(&entry.fast_client_id) {
                return Err(invalid(format!(
                    "fast client ({}) not found for fast user {}",
                    entry.fast_client_id, entry.user.user_id
                )));
            }
            if !users.insert((entry.fast_client_id, entry.user.user_id.as_str())) {
                return Err(invalid(format!(
                    "duplicate fast user {} for client {}",
                    entry.user.user_id, entry.fast_client_id
                )));
            }
        }

        let mut pending = BTreeSet::new();
        for transfer in &self.transfers {
            if !ids.contains(&transfer.fast_client_id) {
                return Err(invalid(format!(
                    "fast client ({}) not found for transfer to {}",
                    transfer.fast_client_id, transfer.new_owner_address
                )));
            }
            if !pending.insert(transfer.fast_client_id) {
                return Err(invalid(format!(
                    "duplicate transfer for fast client {}",
                    transfer.fast_client_id
                )));
            }
        }

        self.params
            .validate()
            .map_err(|e| invalid(e.to_string()))
    }
}

impl Keeper {
    /// Write `genesis` into an empty store. The state is validated first.
    pub fn init_genesis<S: KvStore + ?Sized>(
        &self,
        kv: &mut S,
        genesis: &GenesisState,
    ) -> Result<(), FastError> {
        genesis.validate()?;

        self.schema.params.set(kv, &genesis.params)?;
        self.schema.client_id.set(kv, genesis.starting_fast_client_id)?;
        for client in &genesis.fast_clients {
            self.schema.clients.set(kv, &client.public_key, client)?;
        }
        for entry in &genesis.fast_users {
            self.schema.users.set(
                kv,
                &(entry.fast_client_id, entry.user.user_id.clone()),
                &entry.user,
            )?;
        }
        for transfer in &genesis.transfers {
            self.schema
                .transfers
                .set(kv, &transfer.fast_client_id, &transfer.new_owner_address)?;
        }

        info!(
            clients = genesis.fast_clients.len(),
            users = genesis.fast_users.len(),
            transfers = genesis.transfers.len(),
            starting_fast_client_id = genesis.starting_fast_client_id,
            "genesis initialised"
        );
        Ok(())
    }

    /// Read the full state back in store order.
    pub fn export_genesis<S: KvStore + ?Sized>(&self, kv: &S) -> Result<GenesisState, FastError> {
        let fast_clients = self
            .schema
            .clients
            .iter(kv)?
            .into_iter()
            .map(|(_, client)| client)
            .collect();
        let fast_users = self
            .schema
            .users
            .iter(kv)?
            .into_iter()
            .map(|((fast_client_id, _), user)| UserWithFastClientId {
                fast_client_id,
                user,
            })
            .collect();
        let transfers = self
            .schema
            .transfers
            .iter(kv)?
            .into_iter()
            .map(|(fast_client_id, new_owner_address)| FastClientTransferOwnership {
                fast_client_id,
                new_owner_address,
            })
            .collect();

        Ok(GenesisState {
            params: self.params(kv)?,
            starting_fast_client_id: self.schema.client_id.peek(kv)?,
            fast_clients,
            fast_users,
            transfers,
        })
    }
}
