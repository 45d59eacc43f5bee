//! User subledger: add, remove, top up and expire user credits.

use fast_types::client::validate_user_id;
use fast_types::{Coin, FastUser};
use tracing::info;

use crate::error::FastError;
use crate::events::FastEvent;
use crate::keeper::{require_role, Context, Keeper};
use crate::msgs::{MsgAddUser, MsgExpireUserCredits, MsgRemoveUser, MsgTopUpUser};

impl Keeper {
    pub(crate) fn add_user(&self, ctx: &mut Context<'_>, msg: &MsgAddUser) -> Result<(), FastError> {
        let mut client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;
        require_role("admin", &client.admin_address, &msg.admin_address)?;

        let params = self.params(&*ctx.kv)?;
        validate_user_id(&msg.user_id, params.max_user_id_length)?;

        let key = (client.id, msg.user_id.clone());
        if self.schema.users.has(&*ctx.kv, &key)? {
            return Err(FastError::AlreadyExists(format!(
                "user {} of fast client {}",
                msg.user_id, client.id
            )));
        }

        let user = FastUser::new(msg.user_id.clone(), msg.initial_credits);
        ctx.emit(FastEvent::AddUser {
            fast_client_id: client.id,
            fast_client_pubkey: client.public_key.clone(),
            user_id: user.user_id.clone(),
            initial_credits: msg.initial_credits,
        });
        ctx.emit(FastEvent::user_snapshot(&client, &user));

        if !msg.initial_credits.is_zero() {
            let coin = Coin::new(ctx.bank.bond_denom(), msg.initial_credits);
            ctx.bank.send_to_escrow(&msg.admin_address, &coin)?;
            client.deposit(msg.initial_credits)?;
            self.set_client(ctx.kv, &client)?;
            ctx.emit(FastEvent::FastClient(client.clone()));
        }
        self.set_user(ctx.kv, client.id, &user)?;

        info!(
            fast_client_id = client.id,
            user_id = %user.user_id,
            initial_credits = %msg.initial_credits,
            "user added"
        );
        Ok(())
    }

    /// Remaining credits are forfeited into the client's used credits, not
    /// refunded.
    pub(crate) fn remove_user(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgRemoveUser,
    ) -> Result<(), FastError> {
        let mut client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;
        require_role("admin", &client.admin_address, &msg.admin_address)?;
        let user = self.get_user(&*ctx.kv, client.id, &msg.user_id)?;

        let forfeited = !user.credits.is_zero();
        if forfeited {
            client.add_used_credits(user.credits)?;
            self.set_client(ctx.kv, &client)?;
        }
        self.schema
            .users
            .remove(ctx.kv, &(client.id, msg.user_id.clone()))?;

        info!(
            fast_client_id = client.id,
            user_id = %msg.user_id,
            forfeited = %user.credits,
            "user removed"
        );
        ctx.emit(FastEvent::RemoveUser {
            fast_client_id: client.id,
            fast_client_pubkey: client.public_key.clone(),
            user_id: msg.user_id.clone(),
            forfeited_credits: user.credits,
        });
        if forfeited {
            ctx.emit(FastEvent::FastClient(client));
        }
        Ok(())
    }

    /// Anyone may top up a user; the sender pays.
    pub(crate) fn top_up_user(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgTopUpUser,
    ) -> Result<(), FastError> {
        if msg.amount.is_zero() {
            return Err(FastError::InvalidRequest(
                "top up amount must be positive".into(),
            ));
        }
        let mut client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;
        let mut user = self.get_user(&*ctx.kv, client.id, &msg.user_id)?;

        let coin = Coin::new(ctx.bank.bond_denom(), msg.amount);
        ctx.bank.send_to_escrow(&msg.sender, &coin)?;

        user.add_credits(msg.amount)?;
        client.deposit(msg.amount)?;
        self.set_user(ctx.kv, client.id, &user)?;
        self.set_client(ctx.kv, &client)?;

        info!(
            fast_client_id = client.id,
            user_id = %user.user_id,
            amount = %msg.amount,
            sender = %msg.sender,
            "user topped up"
        );
        ctx.emit(FastEvent::TopUpUser {
            fast_client_id: client.id,
            fast_client_pubkey: client.public_key.clone(),
            user_id: user.user_id.clone(),
            sender: msg.sender,
            amount: msg.amount,
        });
        ctx.emit(FastEvent::user_snapshot(&client, &user));
        ctx.emit(FastEvent::FastClient(client));
        Ok(())
    }

    pub(crate) fn expire_user_credits(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgExpireUserCredits,
    ) -> Result<(), FastError> {
        let mut client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;
        require_role("admin", &client.admin_address, &msg.admin_address)?;
        let mut user = self.get_user(&*ctx.kv, client.id, &msg.user_id)?;

        user.use_credits(msg.amount)?;
        client.add_used_credits(msg.amount)?;
        self.set_user(ctx.kv, client.id, &user)?;
        self.set_client(ctx.kv, &client)?;

        info!(
            fast_client_id = client.id,
            user_id = %user.user_id,
            amount = %msg.amount,
            "user credits expired"
        );
        ctx.emit(FastEvent::ExpireUserCredits {
            fast_client_id: client.id,
            fast_client_pubkey: client.public_key.clone(),
            user_id: user.user_id.clone(),
            amount: msg.amount,
        });
        ctx.emit(FastEvent::FastClient(client.clone()));
        ctx.emit(FastEvent::user_snapshot(&client, &user));
        Ok(())
    }
}
