//! Two-step ownership transfer: propose, then accept or cancel.
//!
//! Each client has at most one pending proposal; a new proposal replaces the
//! previous one.

use tracing::info;

use crate::error::FastError;
use crate::events::FastEvent;
use crate::keeper::{require_role, Context, Keeper};
use crate::msgs::{MsgAcceptOwnership, MsgCancelOwnershipTransfer, MsgTransferOwnership};

impl Keeper {
    pub(crate) fn transfer_ownership(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgTransferOwnership,
    ) -> Result<(), FastError> {
        let client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;
        require_role("owner", &client.owner_address, &msg.owner_address)?;

        self.schema
            .transfers
            .set(ctx.kv, &client.id, &msg.new_owner_address)?;

        info!(
            fast_client_id = client.id,
            new_owner = %msg.new_owner_address,
            "ownership transfer proposed"
        );
        ctx.emit(FastEvent::TransferOwnership {
            fast_client_id: client.id,
            owner_address: msg.owner_address,
            new_owner_address: msg.new_owner_address,
        });
        Ok(())
    }

    /// A missing proposal and a proposal to someone else are reported the
    /// same way.
    pub(crate) fn accept_ownership(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgAcceptOwnership,
    ) -> Result<(), FastError> {
        let mut client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;

        match self.schema.transfers.get(&*ctx.kv, &client.id)? {
            Some(pending) if pending == msg.new_owner_address => {}
            _ => {
                return Err(FastError::NotFound(format!(
                    "no ownership transfer to {} pending for fast client {}",
                    msg.new_owner_address, client.id
                )))
            }
        }

        client.owner_address = msg.new_owner_address;
        self.set_client(ctx.kv, &client)?;
        self.schema.transfers.remove(ctx.kv, &client.id)?;

        info!(
            fast_client_id = client.id,
            new_owner = %msg.new_owner_address,
            "ownership transfer accepted"
        );
        ctx.emit(FastEvent::AcceptOwnership {
            fast_client_id: client.id,
            new_owner_address: msg.new_owner_address,
        });
        ctx.emit(FastEvent::FastClient(client));
        Ok(())
    }

    pub(crate) fn cancel_ownership_transfer(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgCancelOwnershipTransfer,
    ) -> Result<(), FastError> {
        let client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;
        require_role("owner", &client.owner_address, &msg.owner_address)?;

        if !self.schema.transfers.has(&*ctx.kv, &client.id)? {
            return Err(FastError::NotFound(format!(
                "no ownership transfer pending for fast client {}",
                client.id
            )));
        }
        self.schema.transfers.remove(ctx.kv, &client.id)?;

        info!(fast_client_id = client.id, "ownership transfer cancelled");
        ctx.emit(FastEvent::CancelOwnershipTransfer {
            fast_client_id: client.id,
            owner_address: msg.owner_address,
        });
        Ok(())
    }
}
