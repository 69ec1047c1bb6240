use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest `decimals` value accepted in token metadata.
pub const MAX_DECIMALS: u8 = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("token name must not be empty")]
    EmptyName,
    #[error("token symbol must not be empty")]
    EmptySymbol,
    #[error("decimals {0} exceeds maximum of {MAX_DECIMALS}")]
    DecimalsTooLarge(u8),
}

/// Display metadata. Not consulted by any accounting rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: "Basic Carbon Offsets".to_string(),
            symbol: "BCO".to_string(),
            decimals: 0,
        }
    }
}

/// Treatment of `amount == 0` in mint, burn and transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroAmountPolicy {
    /// Accepted as a no-op that still appends an event.
    #[default]
    Allow,
    /// Rejected with `InvalidAmount`.
    Reject,
}

/// Who may burn. Either way a caller only ever burns their own balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnPolicy {
    #[default]
    SelfService,
    AdminOnly,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenPolicy {
    pub zero_amount: ZeroAmountPolicy,
    pub burn: BurnPolicy,
    /// Upper bound on total supply, checked by `initialize` and `mint`.
    pub supply_cap: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub metadata: TokenMetadata,
    pub policy: TokenPolicy,
}

impl TokenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metadata.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.metadata.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.metadata.decimals > MAX_DECIMALS {
            return Err(ConfigError::DecimalsTooLarge(self.metadata.decimals));
        }
        Ok(())
    }
}
