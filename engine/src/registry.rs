//! Client registration, editing and key rotation; params replacement.

use fast_types::client::validate_memo;
use fast_types::{Amount, FastClient};
use tracing::{debug, info};

use crate::error::FastError;
use crate::events::FastEvent;
use crate::keeper::{require_role, Context, Keeper};
use crate::msgs::{MsgEditFastClient, MsgRegisterFastClient, MsgUpdateParams};

impl Keeper {
    pub(crate) fn register_fast_client(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgRegisterFastClient,
    ) -> Result<FastClient, FastError> {
        self.require_authority(&msg.authority)?;

        let params = self.params(&*ctx.kv)?;
        validate_memo(&msg.memo, params.max_memo_length)?;

        if self.schema.clients.has(&*ctx.kv, &msg.public_key)? {
            return Err(FastError::AlreadyExists(format!(
                "fast client {}",
                msg.public_key
            )));
        }

        let id = self.schema.client_id.next(ctx.kv)?;
        let client = FastClient {
            id,
            owner_address: msg.owner_address,
            admin_address: msg.admin_address,
            settlement_address: msg.address,
            public_key: msg.public_key.clone(),
            memo: msg.memo.clone(),
            balance: Amount::ZERO,
            used_credits: Amount::ZERO,
        };
        self.set_client(ctx.kv, &client)?;

        info!(fast_client_id = id, public_key = %client.public_key, "fast client registered");
        ctx.emit(FastEvent::RegisterFastClient { fast_client_id: id });
        ctx.emit(FastEvent::FastClient(client.clone()));
        Ok(client)
    }

    pub(crate) fn edit_fast_client(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgEditFastClient,
    ) -> Result<FastClient, FastError> {
        let mut client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;
        require_role("owner", &client.owner_address, &msg.owner_address)?;

        if let Some(admin) = msg.new_admin_address {
            client.admin_address = admin;
        }
        if let Some(address) = msg.new_address {
            client.settlement_address = address;
        }
        if let Some(memo) = &msg.new_memo {
            let params = self.params(&*ctx.kv)?;
            validate_memo(memo, params.max_memo_length)?;
            client.memo = memo.clone();
        }
        if let Some(new_key) = &msg.new_public_key {
            if *new_key != client.public_key {
                if self.schema.clients.has(&*ctx.kv, new_key)? {
                    return Err(FastError::AlreadyExists(format!(
                        "fast client {new_key}"
                    )));
                }
                self.schema.clients.remove(ctx.kv, &client.public_key)?;
                debug!(
                    fast_client_id = client.id,
                    old = %client.public_key,
                    new = %new_key,
                    "rotating fast client key"
                );
                client.public_key = new_key.clone();
            }
        }
        self.set_client(ctx.kv, &client)?;

        info!(fast_client_id = client.id, "fast client updated");
        ctx.emit(FastEvent::UpdateFastClient {
            fast_client_id: client.id,
        });
        ctx.emit(FastEvent::FastClient(client.clone()));
        Ok(client)
    }

    pub(crate) fn update_params(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgUpdateParams,
    ) -> Result<(), FastError> {
        self.require_authority(&msg.authority)?;
        msg.params.validate()?;
        self.schema.params.set(ctx.kv, &msg.params)?;

        info!(params = ?msg.params, "params updated");
        ctx.emit(FastEvent::UpdateParams);
        Ok(())
    }
}
