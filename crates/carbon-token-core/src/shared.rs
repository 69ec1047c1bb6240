//! Lock wrapper for hosts that do not serialize calls themselves.
//!
//! One `RwLock` guards the whole engine. Writes hold it across
//! validate-then-apply; reads hand back owned copies, so a reader only
//! ever sees state produced by fully committed operations.

use crate::account::AccountId;
use crate::engine::{CallContext, TokenEngine, TokenError};
use crate::events::{Event, EventSeq};
use crate::snapshot::TokenSnapshot;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone, Debug, Default)]
pub struct SharedToken {
    inner: Arc<RwLock<TokenEngine>>,
}

impl SharedToken {
    pub fn new(engine: TokenEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn initialize(
        &self,
        height: u64,
        admin: AccountId,
        initial_supply: u64,
    ) -> Result<EventSeq, TokenError> {
        self.write().initialize(height, admin, initial_supply)
    }

    pub fn mint(
        &self,
        ctx: &CallContext,
        to: AccountId,
        amount: u64,
    ) -> Result<EventSeq, TokenError> {
        self.write().mint(ctx, to, amount)
    }

    pub fn burn(&self, ctx: &CallContext, amount: u64) -> Result<EventSeq, TokenError> {
        self.write().burn(ctx, amount)
    }

    pub fn transfer(
        &self,
        ctx: &CallContext,
        to: AccountId,
        amount: u64,
    ) -> Result<EventSeq, TokenError> {
        self.write().transfer(ctx, to, amount)
    }

    pub fn set_admin(
        &self,
        ctx: &CallContext,
        new_admin: Option<AccountId>,
    ) -> Result<EventSeq, TokenError> {
        self.write().set_admin(ctx, new_admin)
    }

    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.read().balance_of(account)
    }

    pub fn total_supply(&self) -> u64 {
        self.read().total_supply()
    }

    pub fn snapshot(&self) -> TokenSnapshot {
        self.read().snapshot()
    }

    /// Copies events from `from_seq` onwards out of the log.
    pub fn events_from(&self, from_seq: EventSeq) -> Vec<Event> {
        self.read().events().iterate(from_seq).cloned().collect()
    }

    /// Runs `f` against the engine under the read lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&TokenEngine) -> R) -> R {
        f(&self.read())
    }

    // Engine operations never leave partial state behind, so a poisoned
    // lock still guards a consistent engine.
    fn read(&self) -> RwLockReadGuard<'_, TokenEngine> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TokenEngine> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
