//! Typed events released by successful ledger calls.

use fast_types::{AccountAddress, Amount, FastClient, FastUser, PubKey};
use serde::Serialize;

use crate::msgs::SettleType;

/// Events are returned to the host in emission order and only when the call
/// that produced them committed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FastEvent {
    RegisterFastClient {
        fast_client_id: u64,
    },
    UpdateFastClient {
        fast_client_id: u64,
    },
    UpdateParams,
    /// Full snapshot of a client after a change.
    FastClient(FastClient),
    /// Full snapshot of a user after a change.
    FastUser {
        fast_client_id: u64,
        fast_client_pubkey: PubKey,
        user_id: String,
        credits: Amount,
    },
    AddUser {
        fast_client_id: u64,
        fast_client_pubkey: PubKey,
        user_id: String,
        initial_credits: Amount,
    },
    RemoveUser {
        fast_client_id: u64,
        fast_client_pubkey: PubKey,
        user_id: String,
        forfeited_credits: Amount,
    },
    TopUpUser {
        fast_client_id: u64,
        fast_client_pubkey: PubKey,
        user_id: String,
        sender: AccountAddress,
        amount: Amount,
    },
    ExpireUserCredits {
        fast_client_id: u64,
        fast_client_pubkey: PubKey,
        user_id: String,
        amount: Amount,
    },
    UseUserCredits {
        fast_client_id: u64,
        fast_client_pubkey: PubKey,
        user_id: String,
        credits: Amount,
    },
    SettleCredits {
        fast_client_id: u64,
        fast_client_pubkey: PubKey,
        settle_type: SettleType,
        credits: Amount,
    },
    SubmitReports {
        fast_client_id: u64,
        fast_client_pubkey: PubKey,
    },
    DataProxyPayout {
        data_proxy_pubkey: PubKey,
        payout_address: AccountAddress,
        amount: Amount,
    },
    UnregisteredDataProxy {
        data_proxy_pubkey: PubKey,
    },
    InvalidDataProxyPayoutAddress {
        data_proxy_pubkey: PubKey,
        payout_address: String,
        amount: Amount,
    },
    TransferOwnership {
        fast_client_id: u64,
        owner_address: AccountAddress,
        new_owner_address: AccountAddress,
    },
    AcceptOwnership {
        fast_client_id: u64,
        new_owner_address: AccountAddress,
    },
    CancelOwnershipTransfer {
        fast_client_id: u64,
        owner_address: AccountAddress,
    },
}

impl FastEvent {
    pub fn user_snapshot(client: &FastClient, user: &FastUser) -> Self {
        FastEvent::FastUser {
            fast_client_id: client.id,
            fast_client_pubkey: client.public_key.clone(),
            user_id: user.user_id.clone(),
            credits: user.credits,
        }
    }

    /// The event type name, as used in event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FastEvent::RegisterFastClient { .. } => "register_fast_client",
            FastEvent::UpdateFastClient { .. } => "update_fast_client",
            FastEvent::UpdateParams => "update_params",
            FastEvent::FastClient(_) => "fast_client",
            FastEvent::FastUser { .. } => "fast_user",
            FastEvent::AddUser { .. } => "add_user",
            FastEvent::RemoveUser { .. } => "remove_user",
            FastEvent::TopUpUser { .. } => "top_up_user",
            FastEvent::ExpireUserCredits { .. } => "expire_user_credits",
            FastEvent::UseUserCredits { .. } => "use_user_credits",
            FastEvent::SettleCredits { .. } => "settle_credits",
            FastEvent::SubmitReports { .. } => "submit_reports",
            FastEvent::DataProxyPayout { .. } => "data_proxy_payout",
            FastEvent::UnregisteredDataProxy { .. } => "unregistered_data_proxy",
            FastEvent::InvalidDataProxyPayoutAddress { .. } => {
                "invalid_data_proxy_payout_address"
            }
            FastEvent::TransferOwnership { .. } => "transfer_ownership",
            FastEvent::AcceptOwnership { .. } => "accept_ownership",
            FastEvent::CancelOwnershipTransfer { .. } => "cancel_ownership_transfer",
        }
    }
}
