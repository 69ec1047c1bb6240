use anyhow::Context;
use carbon_token_core::{AccountId, TokenConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Constructor arguments passed to `initialize` at deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub admin: AccountId,
    pub initial_supply: u64,
    #[serde(default)]
    pub height: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub token: TokenConfig,
    pub genesis: Genesis,
}

impl DeploymentConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading deployment config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.token.validate()?;
        Ok(config)
    }
}
