//! Transaction messages accepted by the ledger.
//!
//! Every message carries the authenticated signer as its first field. The
//! host is responsible for checking that the signer actually signed the
//! transaction; the ledger only compares it against the stored roles.

use std::collections::BTreeSet;

use fast_types::{AccountAddress, Amount, FastClient, Params, PubKey};
use serde::{Deserialize, Serialize};

use crate::error::FastError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRegisterFastClient {
    pub authority: AccountAddress,
    pub owner_address: AccountAddress,
    pub admin_address: AccountAddress,
    /// Settlement address: the only account allowed to submit reports.
    pub address: AccountAddress,
    pub public_key: PubKey,
    #[serde(default)]
    pub memo: String,
}

/// `None` leaves the corresponding field unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgEditFastClient {
    pub owner_address: AccountAddress,
    pub fast_client_public_key: PubKey,
    #[serde(default)]
    pub new_admin_address: Option<AccountAddress>,
    #[serde(default)]
    pub new_address: Option<AccountAddress>,
    #[serde(default)]
    pub new_memo: Option<String>,
    #[serde(default)]
    pub new_public_key: Option<PubKey>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    pub authority: AccountAddress,
    pub params: Params,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransferOwnership {
    pub owner_address: AccountAddress,
    pub fast_client_public_key: PubKey,
    pub new_owner_address: AccountAddress,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAcceptOwnership {
    pub new_owner_address: AccountAddress,
    pub fast_client_public_key: PubKey,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCancelOwnershipTransfer {
    pub owner_address: AccountAddress,
    pub fast_client_public_key: PubKey,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAddUser {
    pub admin_address: AccountAddress,
    pub fast_client_public_key: PubKey,
    pub user_id: String,
    #[serde(default)]
    pub initial_credits: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRemoveUser {
    pub admin_address: AccountAddress,
    pub fast_client_public_key: PubKey,
    pub user_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTopUpUser {
    pub sender: AccountAddress,
    pub fast_client_public_key: PubKey,
    pub user_id: String,
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExpireUserCredits {
    pub admin_address: AccountAddress,
    pub fast_client_public_key: PubKey,
    pub user_id: String,
    pub amount: Amount,
}

/// What happens to settled tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleType {
    /// Destroy the tokens held in escrow.
    Burn,
    /// Send the tokens to the client's admin.
    Withdraw,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSettleCredits {
    pub admin_address: AccountAddress,
    pub fast_client_public_key: PubKey,
    pub amount: Amount,
    pub settle_type: SettleType,
}

/// Usage a user incurred at one data proxy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataProxyReport {
    pub data_proxy_pubkey: PubKey,
    /// Number of requests served.
    pub amount: u64,
    /// Price per request.
    pub price: Amount,
}

/// Usage of one user since the previous report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReport {
    pub user_id: String,
    pub used_credits: Amount,
    #[serde(default)]
    pub data_proxy_reports: Vec<DataProxyReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitReports {
    /// Caller; must be the client's settlement address.
    pub address: AccountAddress,
    pub fast_client_public_key: PubKey,
    pub reports: Vec<UserReport>,
}

/// Every message the ledger accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Msg {
    RegisterFastClient(MsgRegisterFastClient),
    EditFastClient(MsgEditFastClient),
    UpdateParams(MsgUpdateParams),
    TransferOwnership(MsgTransferOwnership),
    AcceptOwnership(MsgAcceptOwnership),
    CancelOwnershipTransfer(MsgCancelOwnershipTransfer),
    AddUser(MsgAddUser),
    RemoveUser(MsgRemoveUser),
    TopUpUser(MsgTopUpUser),
    ExpireUserCredits(MsgExpireUserCredits),
    SettleCredits(MsgSettleCredits),
    SubmitReports(MsgSubmitReports),
}

/// Result of a successful message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgResponse {
    Empty,
    Client(FastClient),
}

fn require_key(key: &PubKey, field: &str) -> Result<(), FastError> {
    if key.is_empty() {
        return Err(FastError::InvalidRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_user_id(user_id: &str) -> Result<(), FastError> {
    if user_id.is_empty() {
        return Err(FastError::InvalidRequest("user id must not be empty".into()));
    }
    Ok(())
}

impl Msg {
    pub fn type_name(&self) -> &'static str {
        match self {
            Msg::RegisterFastClient(_) => "register_fast_client",
            Msg::EditFastClient(_) => "edit_fast_client",
            Msg::UpdateParams(_) => "update_params",
            Msg::TransferOwnership(_) => "transfer_ownership",
            Msg::AcceptOwnership(_) => "accept_ownership",
            Msg::CancelOwnershipTransfer(_) => "cancel_ownership_transfer",
            Msg::AddUser(_) => "add_user",
            Msg::RemoveUser(_) => "remove_user",
            Msg::TopUpUser(_) => "top_up_user",
            Msg::ExpireUserCredits(_) => "expire_user_credits",
            Msg::SettleCredits(_) => "settle_credits",
            Msg::SubmitReports(_) => "submit_reports",
        }
    }

    /// The account that signed this message.
    pub fn signer(&self) -> &AccountAddress {
        match self {
            Msg::RegisterFastClient(m) => &m.authority,
            Msg::EditFastClient(m) => &m.owner_address,
            Msg::UpdateParams(m) => &m.authority,
            Msg::TransferOwnership(m) => &m.owner_address,
            Msg::AcceptOwnership(m) => &m.new_owner_address,
            Msg::CancelOwnershipTransfer(m) => &m.owner_address,
            Msg::AddUser(m) => &m.admin_address,
            Msg::RemoveUser(m) => &m.admin_address,
            Msg::TopUpUser(m) => &m.sender,
            Msg::ExpireUserCredits(m) => &m.admin_address,
            Msg::SettleCredits(m) => &m.admin_address,
            Msg::SubmitReports(m) => &m.address,
        }
    }

    /// Stateless checks that need no store access.
    pub fn validate_basic(&self) -> Result<(), FastError> {
        match self {
            Msg::RegisterFastClient(m) => require_key(&m.public_key, "public key"),
            Msg::EditFastClient(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")?;
                if let Some(key) = &m.new_public_key {
                    require_key(key, "new public key")?;
                }
                Ok(())
            }
            Msg::UpdateParams(_) => Ok(()),
            Msg::TransferOwnership(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")
            }
            Msg::AcceptOwnership(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")
            }
            Msg::CancelOwnershipTransfer(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")
            }
            Msg::AddUser(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")?;
                require_user_id(&m.user_id)
            }
            Msg::RemoveUser(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")?;
                require_user_id(&m.user_id)
            }
            Msg::TopUpUser(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")?;
                require_user_id(&m.user_id)?;
                if m.amount.is_zero() {
                    return Err(FastError::InvalidRequest(
                        "top up amount must be positive".into(),
                    ));
                }
                Ok(())
            }
            Msg::ExpireUserCredits(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")?;
                require_user_id(&m.user_id)
            }
            Msg::SettleCredits(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")
            }
            Msg::SubmitReports(m) => {
                require_key(&m.fast_client_public_key, "fast client public key")?;
                if m.reports.is_empty() {
                    return Err(FastError::InvalidRequest("no reports submitted".into()));
                }
                let mut seen = BTreeSet::new();
                for report in &m.reports {
                    require_user_id(&report.user_id)?;
                    if !seen.insert(report.user_id.as_str()) {
                        return Err(FastError::InvalidRequest(format!(
                            "duplicate report for user {}",
                            report.user_id
                        )));
                    }
                    for proxy in &report.data_proxy_reports {
                        require_key(&proxy.data_proxy_pubkey, "data proxy public key")?;
                    }
                }
                Ok(())
            }
        }
    }
}
