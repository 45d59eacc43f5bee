//! The ledger's storage layout.
//!
//! | prefix | collection            | key                        | value                |
//! |--------|-----------------------|----------------------------|----------------------|
//! | 0x00   | params                | -                          | `Params`             |
//! | 0x01   | client id sequence    | -                          | u64 (big-endian)     |
//! | 0x02   | clients               | public key bytes           | `FastClient`         |
//! | 0x03   | users                 | client id (BE) ++ user id  | `FastUser`           |
//! | 0x04   | pending transfers     | client id (BE)             | `AccountAddress`     |

use fast_types::{AccountAddress, FastClient, FastUser, Params, PubKey};

use crate::collections::{Item, Map, Sequence};

pub const PARAMS_PREFIX: u8 = 0x00;
pub const CLIENT_ID_PREFIX: u8 = 0x01;
pub const CLIENT_PREFIX: u8 = 0x02;
pub const USER_PREFIX: u8 = 0x03;
pub const TRANSFER_PREFIX: u8 = 0x04;

pub struct LedgerSchema {
    pub params: Item<Params>,
    pub client_id: Sequence,
    pub clients: Map<PubKey, FastClient>,
    pub users: Map<(u64, String), FastUser>,
    pub transfers: Map<u64, AccountAddress>,
}

impl LedgerSchema {
    pub const fn new() -> Self {
        Self {
            params: Item::new(PARAMS_PREFIX),
            client_id: Sequence::new(CLIENT_ID_PREFIX),
            clients: Map::new(CLIENT_PREFIX),
            users: Map::new(USER_PREFIX),
            transfers: Map::new(TRANSFER_PREFIX),
        }
    }
}

impl Default for LedgerSchema {
    fn default() -> Self {
        Self::new()
    }
}
