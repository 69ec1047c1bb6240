use crate::account::AccountId;
use crate::engine::Lifecycle;
use crate::events::EventSeq;
use blake3::Hasher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DIGEST_DOMAIN: &[u8] = b"carbon-token/snapshot/v1";

/// Owned copy of a token instance's committed state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub lifecycle: Lifecycle,
    pub admin: Option<AccountId>,
    pub total_supply: u64,
    pub balances: BTreeMap<AccountId, u64>,
    pub next_seq: EventSeq,
}

impl TokenSnapshot {
    /// BLAKE3 digest over a fixed binary layout of the snapshot, hex encoded.
    /// Two snapshots share a digest iff they are equal.
    pub fn digest(&self) -> String {
        let mut hasher = Hasher::new();
        hasher.update(DIGEST_DOMAIN);
        hasher.update(&[match self.lifecycle {
            Lifecycle::Uninitialized => 0,
            Lifecycle::Active => 1,
        }]);
        match &self.admin {
            Some(admin) => {
                hasher.update(&[1]);
                update_account(&mut hasher, admin);
            }
            None => {
                hasher.update(&[0]);
            }
        }
        hasher.update(&self.total_supply.to_le_bytes());
        hasher.update(&(self.balances.len() as u64).to_le_bytes());
        for (account, balance) in &self.balances {
            update_account(&mut hasher, account);
            hasher.update(&balance.to_le_bytes());
        }
        hasher.update(&self.next_seq.to_le_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn sum_of_balances(&self) -> Option<u64> {
        self.balances
            .values()
            .try_fold(0u64, |acc, b| acc.checked_add(*b))
    }
}

fn update_account(hasher: &mut Hasher, account: &AccountId) {
    let bytes = account.as_bytes();
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
