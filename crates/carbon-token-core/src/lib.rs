pub mod account;
pub mod config;
pub mod engine;
pub mod events;
pub mod guard;
pub mod ledger;
pub mod shared;
pub mod snapshot;


pub use account::{AccountId, AccountIdError};
pub use config::{
    BurnPolicy, ConfigError, TokenConfig, TokenMetadata, TokenPolicy, ZeroAmountPolicy,
};
pub use engine::{CallContext, ErrorKind, Lifecycle, TokenEngine, TokenError};
pub use events::{Event, EventKind, EventLog, EventSeq, Events};
pub use guard::{check_admin, Unauthorized};
pub use ledger::{Ledger, LedgerError};
pub use shared::SharedToken;
pub use snapshot::TokenSnapshot;
