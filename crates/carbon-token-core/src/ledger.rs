//! Balance store for a single token instance.
//!
//! The ledger holds only accounts with a non-zero balance plus a running
//! total-supply counter. Every mutation is computed in full before anything
//! is written, so a rejected call leaves the store untouched and
//! `total_supply == Σ balances` holds after every call.

use crate::account::AccountId;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance on {account}: have {balance}, need {requested}")]
    InsufficientBalance {
        account: AccountId,
        balance: u64,
        requested: u64,
    },
    #[error("credit of {amount} to {account} overflows the representable range")]
    Overflow { account: AccountId, amount: u64 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    balances: BTreeMap<AccountId, u64>,
    total_supply: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account`; unknown accounts hold zero.
    pub fn get_balance(&self, account: &AccountId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Number of accounts holding a non-zero balance.
    pub fn holders(&self) -> usize {
        self.balances.len()
    }

    /// Non-zero balances in account order.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, u64)> + '_ {
        self.balances.iter().map(|(a, b)| (a, *b))
    }

    /// Mint-side mutation: grows both the balance and the supply.
    pub fn credit(&mut self, account: &AccountId, amount: u64) -> Result<(), LedgerError> {
        let overflow = || LedgerError::Overflow {
            account: account.clone(),
            amount,
        };
        let new_supply = self.total_supply.checked_add(amount).ok_or_else(overflow)?;
        let new_balance = self
            .get_balance(account)
            .checked_add(amount)
            .ok_or_else(overflow)?;

        self.store(account, new_balance);
        self.total_supply = new_supply;
        Ok(())
    }

    /// Burn-side mutation: shrinks both the balance and the supply.
    pub fn debit(&mut self, account: &AccountId, amount: u64) -> Result<(), LedgerError> {
        let new_balance = self.checked_debit(account, amount)?;
        // Supply is at least the account balance, so this cannot underflow.
        let new_supply = self.total_supply - amount;

        self.store(account, new_balance);
        self.total_supply = new_supply;
        Ok(())
    }

    /// Moves `amount` from `from` to `to` without touching the supply.
    ///
    /// Both legs are validated before either is written.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let from_after = self.checked_debit(from, amount)?;
        if from == to {
            return Ok(());
        }
        let to_after = self
            .get_balance(to)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow {
                account: to.clone(),
                amount,
            })?;

        self.store(from, from_after);
        self.store(to, to_after);
        Ok(())
    }

    /// Recomputes Σ balances and compares it with the supply counter.
    pub fn is_conserved(&self) -> bool {
        self.balances
            .values()
            .try_fold(0u64, |acc, b| acc.checked_add(*b))
            == Some(self.total_supply)
    }

    fn checked_debit(&self, account: &AccountId, amount: u64) -> Result<u64, LedgerError> {
        let balance = self.get_balance(account);
        balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientBalance {
                account: account.clone(),
                balance,
                requested: amount,
            })
    }

    fn store(&mut self, account: &AccountId, balance: u64) {
        if balance == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(account.clone(), balance);
        }
    }
}
