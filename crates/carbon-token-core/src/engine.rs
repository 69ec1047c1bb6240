//! Token engine: the single owner of ledger, admin identity and event log.
//!
//! Every public operation validates first and writes second. Nothing is
//! written to the ledger or the log unless the whole operation succeeds.

use crate::account::AccountId;
use crate::config::{BurnPolicy, TokenConfig, ZeroAmountPolicy};
use crate::events::{EventKind, EventLog, EventSeq};
use crate::guard::{check_admin, Unauthorized};
use crate::ledger::{Ledger, LedgerError};
use crate::snapshot::TokenSnapshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("access error: {0}")]
    Access(#[from] Unauthorized),
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("token is already initialized")]
    AlreadyInitialized,
    #[error("token is not initialized")]
    NotInitialized,
    #[error("zero amount rejected by token policy")]
    InvalidAmount,
    #[error("total supply would reach {requested}, above cap {cap}")]
    SupplyCapExceeded { cap: u64, requested: u64 },
}

/// Flat classification of [`TokenError`] for hosts and metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    InsufficientBalance,
    Overflow,
    AlreadyInitialized,
    NotInitialized,
    InvalidAmount,
    SupplyCapExceeded,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::InsufficientBalance => "insufficient_balance",
            ErrorKind::Overflow => "overflow",
            ErrorKind::AlreadyInitialized => "already_initialized",
            ErrorKind::NotInitialized => "not_initialized",
            ErrorKind::InvalidAmount => "invalid_amount",
            ErrorKind::SupplyCapExceeded => "supply_cap_exceeded",
        }
    }
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::Access(_) => ErrorKind::Unauthorized,
            TokenError::Ledger(LedgerError::InsufficientBalance { .. }) => {
                ErrorKind::InsufficientBalance
            }
            TokenError::Ledger(LedgerError::Overflow { .. }) => ErrorKind::Overflow,
            TokenError::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            TokenError::NotInitialized => ErrorKind::NotInitialized,
            TokenError::InvalidAmount => ErrorKind::InvalidAmount,
            TokenError::SupplyCapExceeded { .. } => ErrorKind::SupplyCapExceeded,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Active,
}

/// Caller identity (already authenticated by the host) and logical time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: AccountId,
    pub height: u64,
}

impl CallContext {
    pub fn new(caller: AccountId, height: u64) -> Self {
        Self { caller, height }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TokenEngine {
    config: TokenConfig,
    lifecycle: Lifecycle,
    admin: Option<AccountId>,
    ledger: Ledger,
    log: EventLog,
}

impl TokenEngine {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Deployment hook. Sets the admin and credits it with the initial
    /// supply; the only way out of `Uninitialized`.
    pub fn initialize(
        &mut self,
        height: u64,
        admin: AccountId,
        initial_supply: u64,
    ) -> Result<EventSeq, TokenError> {
        self.try_initialize(&admin, initial_supply)
            .map_err(|e| reject("initialize", &admin, e))?;

        self.admin = Some(admin.clone());
        self.lifecycle = Lifecycle::Active;
        let caller = admin.clone();
        Ok(self.commit(
            &caller,
            height,
            EventKind::Mint {
                to: admin,
                amount: initial_supply,
            },
        ))
    }

    /// Admin-only issuance to `to`.
    pub fn mint(
        &mut self,
        ctx: &CallContext,
        to: AccountId,
        amount: u64,
    ) -> Result<EventSeq, TokenError> {
        self.try_mint(ctx, &to, amount)
            .map_err(|e| reject("mint", &ctx.caller, e))?;
        Ok(self.commit(&ctx.caller, ctx.height, EventKind::Mint { to, amount }))
    }

    /// Retires `amount` from the caller's own balance.
    pub fn burn(&mut self, ctx: &CallContext, amount: u64) -> Result<EventSeq, TokenError> {
        self.try_burn(ctx, amount)
            .map_err(|e| reject("burn", &ctx.caller, e))?;
        Ok(self.commit(
            &ctx.caller,
            ctx.height,
            EventKind::Burn {
                from: ctx.caller.clone(),
                amount,
            },
        ))
    }

    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        to: AccountId,
        amount: u64,
    ) -> Result<EventSeq, TokenError> {
        self.try_transfer(ctx, &to, amount)
            .map_err(|e| reject("transfer", &ctx.caller, e))?;
        Ok(self.commit(
            &ctx.caller,
            ctx.height,
            EventKind::Transfer {
                from: ctx.caller.clone(),
                to,
                amount,
            },
        ))
    }

    /// Hands the admin role to `new_admin`, or clears it with `None`.
    /// Once cleared, no further mint or admin change is possible.
    pub fn set_admin(
        &mut self,
        ctx: &CallContext,
        new_admin: Option<AccountId>,
    ) -> Result<EventSeq, TokenError> {
        self.ensure_active()
            .and_then(|()| self.ensure_admin(&ctx.caller))
            .map_err(|e| reject("set_admin", &ctx.caller, e))?;

        let previous = std::mem::replace(&mut self.admin, new_admin.clone());
        Ok(self.commit(
            &ctx.caller,
            ctx.height,
            EventKind::AdminChanged {
                previous,
                new: new_admin,
            },
        ))
    }

    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.ledger.get_balance(account)
    }

    pub fn total_supply(&self) -> u64 {
        self.ledger.total_supply()
    }

    pub fn admin(&self) -> Option<&AccountId> {
        self.admin.as_ref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    pub fn snapshot(&self) -> TokenSnapshot {
        TokenSnapshot {
            lifecycle: self.lifecycle,
            admin: self.admin.clone(),
            total_supply: self.ledger.total_supply(),
            balances: self.ledger.iter().map(|(a, b)| (a.clone(), b)).collect(),
            next_seq: self.log.next_seq(),
        }
    }

    fn try_initialize(
        &mut self,
        admin: &AccountId,
        initial_supply: u64,
    ) -> Result<(), TokenError> {
        if self.lifecycle == Lifecycle::Active {
            return Err(TokenError::AlreadyInitialized);
        }
        self.check_cap(initial_supply)?;
        self.ledger.credit(admin, initial_supply)?;
        Ok(())
    }

    fn try_mint(
        &mut self,
        ctx: &CallContext,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), TokenError> {
        self.ensure_active()?;
        self.ensure_admin(&ctx.caller)?;
        self.check_amount(amount)?;
        self.check_cap(amount)?;
        self.ledger.credit(to, amount)?;
        Ok(())
    }

    fn try_burn(&mut self, ctx: &CallContext, amount: u64) -> Result<(), TokenError> {
        self.ensure_active()?;
        if self.config.policy.burn == BurnPolicy::AdminOnly {
            self.ensure_admin(&ctx.caller)?;
        }
        self.check_amount(amount)?;
        self.ledger.debit(&ctx.caller, amount)?;
        Ok(())
    }

    fn try_transfer(
        &mut self,
        ctx: &CallContext,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), TokenError> {
        self.ensure_active()?;
        self.check_amount(amount)?;
        self.ledger.transfer(&ctx.caller, to, amount)?;
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), TokenError> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::Uninitialized => Err(TokenError::NotInitialized),
        }
    }

    fn ensure_admin(&self, caller: &AccountId) -> Result<(), TokenError> {
        Ok(check_admin(caller, self.admin.as_ref())?)
    }

    fn check_amount(&self, amount: u64) -> Result<(), TokenError> {
        if amount == 0 && self.config.policy.zero_amount == ZeroAmountPolicy::Reject {
            return Err(TokenError::InvalidAmount);
        }
        Ok(())
    }

    /// A sum that overflows is left for the ledger to report as `Overflow`.
    fn check_cap(&self, amount: u64) -> Result<(), TokenError> {
        let Some(cap) = self.config.policy.supply_cap else {
            return Ok(());
        };
        match self.ledger.total_supply().checked_add(amount) {
            Some(requested) if requested > cap => {
                Err(TokenError::SupplyCapExceeded { cap, requested })
            }
            _ => Ok(()),
        }
    }

    fn commit(&mut self, caller: &AccountId, height: u64, kind: EventKind) -> EventSeq {
        let label = kind.label();
        let amount = kind.amount();
        let seq = self.log.append(height, kind);
        debug!(
            seq,
            height,
            %caller,
            event = label,
            amount,
            total_supply = self.ledger.total_supply(),
            "token operation committed"
        );
        seq
    }
}

fn reject(op: &'static str, caller: &AccountId, err: TokenError) -> TokenError {
    debug!(op, %caller, error = err.kind().label(), "token operation rejected: {err}");
    err
}
