//! Message dispatch with all-or-nothing execution.
//!
//! Every call runs against a [`StagedStore`] and a [`StagedBank`]. Only when
//! the handler succeeds are the staged bank movements and store writes
//! applied and the events released. A failed call leaves store and bank
//! exactly as they were and produces no events.

use fast_store::{KvStore, StagedStore};
use fast_types::{BankKeeper, DataProxyDirectory};
use tracing::{debug, warn};

use crate::bank::StagedBank;
use crate::error::FastError;
use crate::events::FastEvent;
use crate::keeper::{Context, Keeper};
use crate::msgs::{Msg, MsgResponse};

/// A committed call: its response and the events it emitted, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Executed {
    pub response: MsgResponse,
    pub events: Vec<FastEvent>,
}

impl Keeper {
    pub fn execute<S, B, P>(
        &self,
        store: &mut S,
        bank: &mut B,
        proxies: &P,
        msg: &Msg,
    ) -> Result<Executed, FastError>
    where
        S: KvStore,
        B: BankKeeper,
        P: DataProxyDirectory,
    {
        let result = msg
            .validate_basic()
            .and_then(|()| self.execute_staged(store, bank, proxies, msg));
        match &result {
            Ok(executed) => debug!(
                msg = msg.type_name(),
                signer = %msg.signer(),
                events = executed.events.len(),
                "message executed"
            ),
            Err(e) => warn!(
                msg = msg.type_name(),
                signer = %msg.signer(),
                code = e.code(),
                error = %e,
                "message rejected"
            ),
        }
        result
    }

    fn execute_staged<S, B, P>(
        &self,
        store: &mut S,
        bank: &mut B,
        proxies: &P,
        msg: &Msg,
    ) -> Result<Executed, FastError>
    where
        S: KvStore,
        B: BankKeeper,
        P: DataProxyDirectory,
    {
        let mut staged_store = StagedStore::new(store);
        let mut staged_bank = StagedBank::new(bank);

        let (response, events) = {
            let mut ctx = Context {
                kv: &mut staged_store,
                bank: &mut staged_bank,
                proxies,
                events: Vec::new(),
            };
            let response = self.dispatch(&mut ctx, msg)?;
            (response, ctx.events)
        };

        staged_bank.commit()?;
        staged_store.commit()?;
        Ok(Executed { response, events })
    }

    fn dispatch(&self, ctx: &mut Context<'_>, msg: &Msg) -> Result<MsgResponse, FastError> {
        match msg {
            Msg::RegisterFastClient(m) => self.register_fast_client(ctx, m).map(MsgResponse::Client),
            Msg::EditFastClient(m) => self.edit_fast_client(ctx, m).map(MsgResponse::Client),
            Msg::UpdateParams(m) => self.update_params(ctx, m).map(|()| MsgResponse::Empty),
            Msg::TransferOwnership(m) => {
                self.transfer_ownership(ctx, m).map(|()| MsgResponse::Empty)
            }
            Msg::AcceptOwnership(m) => self.accept_ownership(ctx, m).map(|()| MsgResponse::Empty),
            Msg::CancelOwnershipTransfer(m) => self
                .cancel_ownership_transfer(ctx, m)
                .map(|()| MsgResponse::Empty),
            Msg::AddUser(m) => self.add_user(ctx, m).map(|()| MsgResponse::Empty),
            Msg::RemoveUser(m) => self.remove_user(ctx, m).map(|()| MsgResponse::Empty),
            Msg::TopUpUser(m) => self.top_up_user(ctx, m).map(|()| MsgResponse::Empty),
            Msg::ExpireUserCredits(m) => {
                self.expire_user_credits(ctx, m).map(|()| MsgResponse::Empty)
            }
            Msg::SettleCredits(m) => self.settle_credits(ctx, m).map(|()| MsgResponse::Empty),
            Msg::SubmitReports(m) => self.submit_reports(ctx, m).map(|()| MsgResponse::Empty),
        }
    }
}
