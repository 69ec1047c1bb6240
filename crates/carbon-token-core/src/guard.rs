//! Admin authorization for privileged token operations.
//!
//! A single admin identity gates `mint` and `set_admin`. The check is a
//! pure function of the caller and the current admin so it can be tested
//! without an engine instance.

use crate::account::AccountId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{caller} is not the token admin")]
pub struct Unauthorized {
    pub caller: AccountId,
}

/// Succeeds iff an admin is set and `caller` is that admin.
pub fn check_admin(
    caller: &AccountId,
    current_admin: Option<&AccountId>,
) -> Result<(), Unauthorized> {
    match current_admin {
        Some(admin) if admin == caller => Ok(()),
        _ => Err(Unauthorized {
            caller: caller.clone(),
        }),
    }
}
