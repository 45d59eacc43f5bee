//! The ledger keeper: configuration, storage layout and shared lookups.

use fast_store::{KvStore, LedgerSchema};
use fast_types::{
    AccountAddress, BankKeeper, DataProxyDirectory, FastClient, FastUser, Params, PubKey,
};

use crate::error::FastError;
use crate::events::FastEvent;

/// Owns the ledger's configuration. All state lives in the [`KvStore`] the
/// caller passes in, so one keeper can serve any number of stores.
pub struct Keeper {
    authority: AccountAddress,
    chain_id: String,
    pub(crate) schema: LedgerSchema,
}

/// Everything a message handler may touch during one call.
pub(crate) struct Context<'a> {
    pub kv: &'a mut dyn KvStore,
    pub bank: &'a mut dyn BankKeeper,
    pub proxies: &'a dyn DataProxyDirectory,
    pub events: Vec<FastEvent>,
}

impl Context<'_> {
    pub fn emit(&mut self, event: FastEvent) {
        self.events.push(event);
    }
}

impl Keeper {
    pub fn new(authority: AccountAddress, chain_id: impl Into<String>) -> Self {
        Self {
            authority,
            chain_id: chain_id.into(),
            schema: LedgerSchema::new(),
        }
    }

    /// The only account allowed to register clients and replace params.
    pub fn authority(&self) -> &AccountAddress {
        &self.authority
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub(crate) fn require_authority(&self, signer: &AccountAddress) -> Result<(), FastError> {
        if *signer != self.authority {
            return Err(FastError::Unauthorized(format!(
                "expected authority {}, got {signer}",
                self.authority
            )));
        }
        Ok(())
    }

    /// Stored params, or the defaults before genesis wrote any.
    pub fn params<S: KvStore + ?Sized>(&self, kv: &S) -> Result<Params, FastError> {
        Ok(self.schema.params.get(kv)?.unwrap_or_default())
    }

    pub fn get_client<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        public_key: &PubKey,
    ) -> Result<FastClient, FastError> {
        self.schema
            .clients
            .get(kv, public_key)?
            .ok_or_else(|| FastError::NotFound(format!("fast client {public_key}")))
    }

    pub fn get_user<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        client_id: u64,
        user_id: &str,
    ) -> Result<FastUser, FastError> {
        self.schema
            .users
            .get(kv, &(client_id, user_id.to_string()))?
            .ok_or_else(|| FastError::NotFound(format!("user {user_id} of fast client {client_id}")))
    }

    pub(crate) fn set_client(
        &self,
        kv: &mut dyn KvStore,
        client: &FastClient,
    ) -> Result<(), FastError> {
        self.schema.clients.set(kv, &client.public_key, client)?;
        Ok(())
    }

    pub(crate) fn set_user(
        &self,
        kv: &mut dyn KvStore,
        client_id: u64,
        user: &FastUser,
    ) -> Result<(), FastError> {
        self.schema
            .users
            .set(kv, &(client_id, user.user_id.clone()), user)?;
        Ok(())
    }
}

pub(crate) fn require_role(
    role: &str,
    expected: &AccountAddress,
    signer: &AccountAddress,
) -> Result<(), FastError> {
    if expected != signer {
        return Err(FastError::Unauthorized(format!(
            "unauthorized {role}; expected {expected}, got {signer}"
        )));
    }
    Ok(())
}
