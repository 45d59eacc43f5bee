//! Replay of a JSON transaction file against an in-memory application.
//!
//! A replay file funds accounts, registers data proxies, then delivers
//! blocks of messages in order. Failed messages are recorded with their
//! error code and do not stop the replay.

use fast_engine::{FastEvent, Msg};
use fast_types::{AccountAddress, Amount, PubKey};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::InMemoryApp;
use crate::NodeError;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReplayFile {
    #[serde(default)]
    pub accounts: Vec<AccountFunding>,
    #[serde(default)]
    pub data_proxies: Vec<DataProxyFixture>,
    #[serde(default)]
    pub blocks: Vec<ReplayBlock>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountFunding {
    pub address: AccountAddress,
    pub amount: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataProxyFixture {
    pub pubkey: PubKey,
    /// Kept as text; an unparsable address is a valid fixture.
    pub payout_address: String,
    pub price: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayBlock {
    pub height: u64,
    #[serde(default)]
    pub txs: Vec<Msg>,
}

/// What happened to one delivered message. `code` is zero on success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TxOutcome {
    pub height: u64,
    pub index: usize,
    pub msg: &'static str,
    pub code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codespace: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    pub events: Vec<FastEvent>,
}

impl ReplayFile {
    pub fn from_json(s: &str) -> Result<Self, NodeError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Apply `file` to `app`, returning one outcome per message.
pub fn replay(app: &mut InMemoryApp, file: &ReplayFile) -> Result<Vec<TxOutcome>, NodeError> {
    for funding in &file.accounts {
        app.bank_mut().fund(funding.address, funding.amount)?;
    }
    for proxy in &file.data_proxies {
        app.proxies_mut()
            .register(proxy.pubkey.clone(), proxy.payout_address.clone(), proxy.price);
    }

    let mut outcomes = Vec::new();
    for block in &file.blocks {
        app.begin_block(block.height)?;
        for (index, msg) in block.txs.iter().enumerate() {
            let outcome = match app.deliver(msg) {
                Ok(executed) => TxOutcome {
                    height: block.height,
                    index,
                    msg: msg.type_name(),
                    code: 0,
                    codespace: None,
                    log: None,
                    events: executed.events,
                },
                Err(NodeError::Fast(e)) => TxOutcome {
                    height: block.height,
                    index,
                    msg: msg.type_name(),
                    code: e.code(),
                    codespace: Some(e.codespace()),
                    log: Some(e.to_string()),
                    events: Vec::new(),
                },
                Err(other) => return Err(other),
            };
            outcomes.push(outcome);
        }
    }

    info!(
        blocks = file.blocks.len(),
        txs = outcomes.len(),
        failed = outcomes.iter().filter(|o| o.code != 0).count(),
        "replay finished"
    );
    Ok(outcomes)
}
