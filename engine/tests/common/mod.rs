#![allow(dead_code)]

use fast_engine::msgs::*;
use fast_engine::{Executed, FastError, Keeper, Msg};
use fast_nullables::{NullBank, NullDataProxyDirectory, NullKvStore};
use fast_types::address::ADDRESS_LEN;
use fast_types::{AccountAddress, Amount, FastClient, Holder, PubKey};

pub const DENOM: &str = "stake";
pub const CHAIN_ID: &str = "fast-test-1";

pub fn addr(b: u8) -> AccountAddress {
    AccountAddress::new([b; ADDRESS_LEN])
}

pub fn authority() -> AccountAddress {
    addr(0xaa)
}
pub fn owner() -> AccountAddress {
    addr(1)
}
pub fn admin() -> AccountAddress {
    addr(2)
}
pub fn settlement() -> AccountAddress {
    addr(3)
}

pub fn client_key() -> PubKey {
    PubKey::new(vec![0x02; 33])
}

/// A keeper plus nullable host capabilities, with the admin pre-funded.
pub struct Harness {
    pub keeper: Keeper,
    pub store: NullKvStore,
    pub bank: NullBank,
    pub proxies: NullDataProxyDirectory,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            keeper: Keeper::new(authority(), CHAIN_ID),
            store: NullKvStore::new(),
            bank: NullBank::new(DENOM)
                .with_funds(admin(), Amount::new(1_000_000))
                .with_funds(addr(9), Amount::new(1_000_000)),
            proxies: NullDataProxyDirectory::new(),
        }
    }

    /// A harness with one registered client under [`client_key`].
    pub fn with_client() -> Self {
        let mut h = Self::new();
        h.exec(register_msg(client_key())).unwrap();
        h
    }

    pub fn exec(&mut self, msg: Msg) -> Result<Executed, FastError> {
        self.keeper
            .execute(&mut self.store, &mut self.bank, &self.proxies, &msg)
    }

    pub fn client(&self) -> FastClient {
        self.keeper
            .query_fast_client(&self.store, &client_key())
            .unwrap()
    }

    pub fn user_credits(&self, user: &str) -> Amount {
        self.keeper
            .query_fast_client_user(&self.store, &client_key(), user)
            .unwrap()
            .credits
    }

    pub fn account_balance(&self, account: AccountAddress) -> Amount {
        use fast_types::BankKeeper;
        self.bank.balance(&Holder::Account(account), DENOM)
    }

    pub fn add_user(&mut self, user: &str, initial: u128) {
        self.exec(Msg::AddUser(MsgAddUser {
            admin_address: admin(),
            fast_client_public_key: client_key(),
            user_id: user.into(),
            initial_credits: Amount::new(initial),
        }))
        .unwrap();
    }

    pub fn top_up(&mut self, user: &str, amount: u128) {
        self.exec(Msg::TopUpUser(MsgTopUpUser {
            sender: addr(9),
            fast_client_public_key: client_key(),
            user_id: user.into(),
            amount: Amount::new(amount),
        }))
        .unwrap();
    }
}

pub fn register_msg(key: PubKey) -> Msg {
    Msg::RegisterFastClient(MsgRegisterFastClient {
        authority: authority(),
        owner_address: owner(),
        admin_address: admin(),
        address: settlement(),
        public_key: key,
        memo: "test client".into(),
    })
}

pub fn proxy_report(key: &[u8], amount: u64, price: u128) -> DataProxyReport {
    DataProxyReport {
        data_proxy_pubkey: PubKey::new(key.to_vec()),
        amount,
        price: Amount::new(price),
    }
}

pub fn user_report(user: &str, used: u128, proxies: Vec<DataProxyReport>) -> UserReport {
    UserReport {
        user_id: user.into(),
        used_credits: Amount::new(used),
        data_proxy_reports: proxies,
    }
}

pub fn submit(reports: Vec<UserReport>) -> Msg {
    Msg::SubmitReports(MsgSubmitReports {
        address: settlement(),
        fast_client_public_key: client_key(),
        reports,
    })
}

pub fn settle(amount: u128, settle_type: SettleType) -> Msg {
    Msg::SettleCredits(MsgSettleCredits {
        admin_address: admin(),
        fast_client_public_key: client_key(),
        amount: Amount::new(amount),
        settle_type,
    })
}
