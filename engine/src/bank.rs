//! Staged token movements.
//!
//! [`StagedBank`] validates every movement against the underlying bank's
//! balances plus the movements already staged in this call, and records it.
//! Nothing reaches the underlying bank until [`StagedBank::commit`]; dropping
//! the staged bank discards every movement.

use std::collections::BTreeMap;

use fast_types::{AccountAddress, Amount, BankError, BankKeeper, Coin, Holder};
use tracing::trace;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Movement {
    ToEscrow(AccountAddress, Coin),
    FromEscrow(AccountAddress, Coin),
    Burn(Coin),
}

#[derive(Clone, Copy, Debug, Default)]
struct Delta {
    credited: Amount,
    debited: Amount,
}

pub struct StagedBank<'a, B: BankKeeper + ?Sized> {
    inner: &'a mut B,
    deltas: BTreeMap<(Holder, String), Delta>,
    movements: Vec<Movement>,
}

impl<'a, B: BankKeeper + ?Sized> StagedBank<'a, B> {
    pub fn new(inner: &'a mut B) -> Self {
        Self {
            inner,
            deltas: BTreeMap::new(),
            movements: Vec::new(),
        }
    }

    /// Number of staged movements.
    pub fn pending(&self) -> usize {
        self.movements.len()
    }

    /// Replay the staged movements on the underlying bank, in order.
    pub fn commit(self) -> Result<(), BankError> {
        let count = self.movements.len();
        for movement in self.movements {
            match movement {
                Movement::ToEscrow(from, coin) => self.inner.send_to_escrow(&from, &coin)?,
                Movement::FromEscrow(to, coin) => self.inner.send_from_escrow(&to, &coin)?,
                Movement::Burn(coin) => self.inner.burn_from_escrow(&coin)?,
            }
        }
        trace!(movements = count, "staged bank movements committed");
        Ok(())
    }

    fn debit(&mut self, holder: Holder, coin: &Coin) -> Result<(), BankError> {
        let available = self.balance(&holder, &coin.denom);
        if available < coin.amount {
            return Err(BankError::InsufficientFunds {
                holder: holder.to_string(),
                denom: coin.denom.clone(),
                needed: coin.amount.raw(),
                available: available.raw(),
            });
        }
        let delta = self
            .deltas
            .entry((holder, coin.denom.clone()))
            .or_default();
        delta.debited = delta
            .debited
            .checked_add(coin.amount)
            .ok_or_else(|| BankError::Overflow(holder.to_string()))?;
        Ok(())
    }

    fn credit(&mut self, holder: Holder, coin: &Coin) -> Result<(), BankError> {
        let delta = self
            .deltas
            .entry((holder, coin.denom.clone()))
            .or_default();
        delta.credited = delta
            .credited
            .checked_add(coin.amount)
            .ok_or_else(|| BankError::Overflow(holder.to_string()))?;
        Ok(())
    }
}

impl<B: BankKeeper + ?Sized> BankKeeper for StagedBank<'_, B> {
    fn bond_denom(&self) -> String {
        self.inner.bond_denom()
    }

    fn balance(&self, holder: &Holder, denom: &str) -> Amount {
        let base = self.inner.balance(holder, denom);
        match self.deltas.get(&(*holder, denom.to_string())) {
            Some(delta) => Amount::new(
                base.raw()
                    .saturating_add(delta.credited.raw())
                    .saturating_sub(delta.debited.raw()),
            ),
            None => base,
        }
    }

    fn send_to_escrow(&mut self, from: &AccountAddress, coin: &Coin) -> Result<(), BankError> {
        self.debit(Holder::Account(*from), coin)?;
        self.credit(Holder::Escrow, coin)?;
        self.movements.push(Movement::ToEscrow(*from, coin.clone()));
        Ok(())
    }

    fn send_from_escrow(&mut self, to: &AccountAddress, coin: &Coin) -> Result<(), BankError> {
        self.debit(Holder::Escrow, coin)?;
        self.credit(Holder::Account(*to), coin)?;
        self.movements.push(Movement::FromEscrow(*to, coin.clone()));
        Ok(())
    }

    fn burn_from_escrow(&mut self, coin: &Coin) -> Result<(), BankError> {
        self.debit(Holder::Escrow, coin)?;
        self.movements.push(Movement::Burn(coin.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fast_nullables::NullBank;
    use fast_types::address::ADDRESS_LEN;

    fn addr(b: u8) -> AccountAddress {
        AccountAddress::new([b; ADDRESS_LEN])
    }

    fn coin(amount: u128) -> Coin {
        Coin::new("stake", Amount::new(amount))
    }

    #[test]
    fn staged_balances_reflect_pending_movements() {
        let mut bank = NullBank::new("stake").with_funds(addr(1), Amount::new(100));
        let mut staged = StagedBank::new(&mut bank);
        staged.send_to_escrow(&addr(1), &coin(70)).unwrap();
        assert_eq!(staged.balance(&Holder::Account(addr(1)), "stake"), Amount::new(30));
        assert_eq!(staged.balance(&Holder::Escrow, "stake"), Amount::new(70));

        let err = staged.send_to_escrow(&addr(1), &coin(31)).unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { needed: 31, available: 30, .. }));
        assert_eq!(staged.pending(), 1);
    }

    #[test]
    fn drop_discards_movements() {
        let mut bank = NullBank::new("stake").with_funds(addr(1), Amount::new(100));
        {
            let mut staged = StagedBank::new(&mut bank);
            staged.send_to_escrow(&addr(1), &coin(100)).unwrap();
            staged.burn_from_escrow(&coin(40)).unwrap();
        }
        assert_eq!(bank.balance(&Holder::Account(addr(1)), "stake"), Amount::new(100));
        assert!(bank.escrow_balance().is_zero());
        assert!(bank.burned("stake").is_zero());
    }

    #[test]
    fn commit_replays_in_order() {
        let mut bank = NullBank::new("stake").with_funds(addr(1), Amount::new(100));
        let mut staged = StagedBank::new(&mut bank);
        staged.send_to_escrow(&addr(1), &coin(100)).unwrap();
        staged.send_from_escrow(&addr(2), &coin(30)).unwrap();
        staged.burn_from_escrow(&coin(20)).unwrap();
        staged.commit().unwrap();

        assert_eq!(bank.balance(&Holder::Account(addr(2)), "stake"), Amount::new(30));
        assert_eq!(bank.escrow_balance(), Amount::new(50));
        assert_eq!(bank.burned("stake"), Amount::new(20));
    }

    #[test]
    fn escrow_cannot_go_negative_within_a_call() {
        let mut bank = NullBank::new("stake").with_funds(addr(1), Amount::new(10));
        let mut staged = StagedBank::new(&mut bank);
        staged.send_to_escrow(&addr(1), &coin(10)).unwrap();
        assert!(staged.send_from_escrow(&addr(2), &coin(11)).is_err());
        assert!(staged.burn_from_escrow(&coin(11)).is_err());
        staged.send_from_escrow(&addr(2), &coin(10)).unwrap();
    }
}
