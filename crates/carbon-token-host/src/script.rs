use anyhow::Context;
use carbon_token_core::{AccountId, CallContext};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Mint {
        to: AccountId,
        amount: u64,
    },
    Burn {
        amount: u64,
    },
    Transfer {
        to: AccountId,
        amount: u64,
    },
    SetAdmin {
        #[serde(default)]
        new_admin: Option<AccountId>,
    },
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Mint { .. } => "mint",
            Operation::Burn { .. } => "burn",
            Operation::Transfer { .. } => "transfer",
            Operation::SetAdmin { .. } => "set_admin",
        }
    }
}

/// One host-authenticated call, as the ledger would sequence it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedCall {
    pub caller: AccountId,
    #[serde(default)]
    pub height: u64,
    #[serde(flatten)]
    pub op: Operation,
}

impl ScriptedCall {
    pub fn context(&self) -> CallContext {
        CallContext::new(self.caller.clone(), self.height)
    }
}

pub fn load(path: &Path) -> anyhow::Result<Vec<ScriptedCall>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading call script {}", path.display()))?;
    parse(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse(raw: &str) -> anyhow::Result<Vec<ScriptedCall>> {
    Ok(serde_json::from_str(raw)?)
}
