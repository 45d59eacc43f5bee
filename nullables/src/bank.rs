//! Nullable bank: per-holder, per-denom balances in memory.

use std::collections::BTreeMap;

use fast_types::{AccountAddress, Amount, BankError, BankKeeper, Coin, Holder};
use tracing::debug;

/// An in-memory bank with a single module escrow account.
#[derive(Clone, Debug)]
pub struct NullBank {
    bond_denom: String,
    balances: BTreeMap<(Holder, String), Amount>,
    burned: BTreeMap<String, Amount>,
}

impl NullBank {
    pub fn new(bond_denom: impl Into<String>) -> Self {
        Self {
            bond_denom: bond_denom.into(),
            balances: BTreeMap::new(),
            burned: BTreeMap::new(),
        }
    }

    /// Mint `amount` of the bond denom into an account.
    pub fn fund(&mut self, account: AccountAddress, amount: Amount) -> Result<(), BankError> {
        let denom = self.bond_denom.clone();
        self.credit(Holder::Account(account), &denom, amount)
    }

    pub fn with_funds(mut self, account: AccountAddress, amount: Amount) -> Self {
        let entry = self
            .balances
            .entry((Holder::Account(account), self.bond_denom.clone()))
            .or_default();
        *entry = Amount::new(entry.raw().saturating_add(amount.raw()));
        self
    }

    pub fn escrow_balance(&self) -> Amount {
        self.balance(&Holder::Escrow, &self.bond_denom)
    }

    pub fn burned(&self, denom: &str) -> Amount {
        self.burned.get(denom).copied().unwrap_or_default()
    }

    /// All non-zero balances, in holder order.
    pub fn balances(&self) -> Vec<(Holder, Coin)> {
        self.balances
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|((holder, denom), amount)| (*holder, Coin::new(denom.clone(), *amount)))
            .collect()
    }

    fn credit(&mut self, holder: Holder, denom: &str, amount: Amount) -> Result<(), BankError> {
        let entry = self
            .balances
            .entry((holder, denom.to_string()))
            .or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| BankError::Overflow(holder.to_string()))?;
        Ok(())
    }

    fn debit(&mut self, holder: Holder, denom: &str, amount: Amount) -> Result<(), BankError> {
        let available = self.balance(&holder, denom);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| BankError::InsufficientFunds {
                holder: holder.to_string(),
                denom: denom.to_string(),
                needed: amount.raw(),
                available: available.raw(),
            })?;
        self.balances.insert((holder, denom.to_string()), remaining);
        Ok(())
    }

    fn transfer(&mut self, from: Holder, to: Holder, coin: &Coin) -> Result<(), BankError> {
        self.debit(from, &coin.denom, coin.amount)?;
        if let Err(e) = self.credit(to, &coin.denom, coin.amount) {
            self.credit(from, &coin.denom, coin.amount)?;
            return Err(e);
        }
        debug!(%from, %to, %coin, "null bank transfer");
        Ok(())
    }
}

impl BankKeeper for NullBank {
    fn bond_denom(&self) -> String {
        self.bond_denom.clone()
    }

    fn balance(&self, holder: &Holder, denom: &str) -> Amount {
        self.balances
            .get(&(*holder, denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    fn send_to_escrow(&mut self, from: &AccountAddress, coin: &Coin) -> Result<(), BankError> {
        self.transfer(Holder::Account(*from), Holder::Escrow, coin)
    }

    fn send_from_escrow(&mut self, to: &AccountAddress, coin: &Coin) -> Result<(), BankError> {
        self.transfer(Holder::Escrow, Holder::Account(*to), coin)
    }

    fn burn_from_escrow(&mut self, coin: &Coin) -> Result<(), BankError> {
        self.debit(Holder::Escrow, &coin.denom, coin.amount)?;
        let entry = self.burned.entry(coin.denom.clone()).or_default();
        *entry = entry
            .checked_add(coin.amount)
            .ok_or_else(|| BankError::Overflow("burned supply".into()))?;
        debug!(%coin, "null bank burn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fast_types::address::ADDRESS_LEN;

    fn addr(b: u8) -> AccountAddress {
        AccountAddress::new([b; ADDRESS_LEN])
    }

    #[test]
    fn test_escrow_roundtrip() {
        let mut bank = NullBank::new("stake").with_funds(addr(1), Amount::new(100));
        let coin = Coin::new("stake", Amount::new(60));
        bank.send_to_escrow(&addr(1), &coin).unwrap();
        assert_eq!(bank.escrow_balance(), Amount::new(60));
        assert_eq!(bank.balance(&Holder::Account(addr(1)), "stake"), Amount::new(40));

        bank.send_from_escrow(&addr(2), &Coin::new("stake", Amount::new(25)))
            .unwrap();
        assert_eq!(bank.balance(&Holder::Account(addr(2)), "stake"), Amount::new(25));
        assert_eq!(bank.escrow_balance(), Amount::new(35));
    }

    #[test]
    fn test_insufficient_funds_leaves_balances() {
        let mut bank = NullBank::new("stake").with_funds(addr(1), Amount::new(10));
        let err = bank
            .send_to_escrow(&addr(1), &Coin::new("stake", Amount::new(11)))
            .unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { needed: 11, available: 10, .. }));
        assert_eq!(bank.balance(&Holder::Account(addr(1)), "stake"), Amount::new(10));
        assert!(bank.escrow_balance().is_zero());
    }

    #[test]
    fn test_burn_tracks_supply() {
        let mut bank = NullBank::new("stake");
        bank.fund(addr(3), Amount::new(50)).unwrap();
        bank.send_to_escrow(&addr(3), &Coin::new("stake", Amount::new(50)))
            .unwrap();
        bank.burn_from_escrow(&Coin::new("stake", Amount::new(20)))
            .unwrap();
        assert_eq!(bank.burned("stake"), Amount::new(20));
        assert_eq!(bank.escrow_balance(), Amount::new(30));
        assert!(bank
            .burn_from_escrow(&Coin::new("stake", Amount::new(31)))
            .is_err());
    }

    #[test]
    fn test_balances_listing_skips_zero() {
        let mut bank = NullBank::new("stake").with_funds(addr(1), Amount::new(5));
        bank.send_to_escrow(&addr(1), &Coin::new("stake", Amount::new(5)))
            .unwrap();
        let listed = bank.balances();
        assert_eq!(listed, vec![(Holder::Escrow, Coin::new("stake", Amount::new(5)))]);
    }
}
