use crate::config::DeploymentConfig;
use crate::script::{Operation, ScriptedCall};
use anyhow::Context;
use carbon_token_core::{ErrorKind, EventSeq, TokenEngine, TokenError};
use carbon_token_metrics::{audit_conservation, TokenMetrics};
use chrono::{DateTime, Utc};
use prometheus::Registry;
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

#[derive(Clone, Debug, Serialize)]
pub struct Rejection {
    pub index: usize,
    pub op: &'static str,
    pub error: ErrorKind,
    pub message: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub symbol: String,
    pub accepted: usize,
    pub rejected: usize,
    pub rejections: Vec<Rejection>,
    pub total_supply: u64,
    pub holders: usize,
    pub next_seq: EventSeq,
    pub state_digest: String,
    pub conserved: bool,
    pub finished_at: DateTime<Utc>,
}

/// Stands in for the ledger runtime: owns one deployed token instance and
/// feeds it calls in order.
pub struct Host {
    engine: TokenEngine,
    registry: Registry,
    metrics: TokenMetrics,
}

impl Host {
    /// Builds the engine and runs the genesis `initialize`.
    pub fn deploy(config: DeploymentConfig) -> anyhow::Result<Self> {
        let registry = Registry::new();
        let metrics = TokenMetrics::new(&registry).context("registering token metrics")?;
        let mut engine = TokenEngine::new(config.token);

        let genesis = config.genesis;
        let seq = engine
            .initialize(genesis.height, genesis.admin.clone(), genesis.initial_supply)
            .context("genesis initialize failed")?;
        if let Some(event) = engine.events().get(seq) {
            metrics.record_event(event);
        }
        metrics.observe_engine(&engine);
        info!(
            admin = %genesis.admin,
            initial_supply = genesis.initial_supply,
            symbol = %engine.config().metadata.symbol,
            "token deployed"
        );

        Ok(Self {
            engine,
            registry,
            metrics,
        })
    }

    pub fn engine(&self) -> &TokenEngine {
        &self.engine
    }

    pub fn execute(&mut self, call: &ScriptedCall) -> Result<EventSeq, TokenError> {
        let ctx = call.context();
        let result = match &call.op {
            Operation::Mint { to, amount } => self.engine.mint(&ctx, to.clone(), *amount),
            Operation::Burn { amount } => self.engine.burn(&ctx, *amount),
            Operation::Transfer { to, amount } => {
                self.engine.transfer(&ctx, to.clone(), *amount)
            }
            Operation::SetAdmin { new_admin } => self.engine.set_admin(&ctx, new_admin.clone()),
        };
        match &result {
            Ok(seq) => {
                if let Some(event) = self.engine.events().get(*seq) {
                    self.metrics.record_event(event);
                }
            }
            Err(err) => self.metrics.record_rejection(err),
        }
        result
    }

    /// Replays `calls` in order. Rejections are reported, never fatal.
    pub fn run(&mut self, calls: &[ScriptedCall]) -> RunReport {
        let mut accepted = 0;
        let mut rejections = Vec::new();
        for (index, call) in calls.iter().enumerate() {
            match self.execute(call) {
                Ok(_) => accepted += 1,
                Err(err) => {
                    warn!(
                        index,
                        op = call.op.label(),
                        caller = %call.caller,
                        error = err.kind().label(),
                        "call rejected: {err}"
                    );
                    rejections.push(Rejection {
                        index,
                        op: call.op.label(),
                        error: err.kind(),
                        message: err.to_string(),
                    });
                }
            }
        }

        let conserved = audit_conservation(&self.metrics, &self.engine);
        let snapshot = self.engine.snapshot();
        info!(
            accepted,
            rejected = rejections.len(),
            total_supply = snapshot.total_supply,
            "script finished"
        );
        RunReport {
            symbol: self.engine.config().metadata.symbol.clone(),
            accepted,
            rejected: rejections.len(),
            rejections,
            total_supply: snapshot.total_supply,
            holders: snapshot.balances.len(),
            next_seq: snapshot.next_seq,
            state_digest: snapshot.digest(),
            conserved,
            finished_at: Utc::now(),
        }
    }

    /// Writes events from `from_seq` onward, then the report, one JSON
    /// document per line.
    pub fn export<W: Write>(
        &self,
        out: &mut W,
        from_seq: EventSeq,
        report: &RunReport,
    ) -> anyhow::Result<()> {
        for event in self.engine.events().iterate(from_seq) {
            serde_json::to_writer(&mut *out, event)?;
            writeln!(out)?;
        }
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn render_metrics(&self) -> anyhow::Result<String> {
        TokenMetrics::render(&self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script;
    use carbon_token_core::AccountId;

    const DEPLOYMENT: &str = include_str!("../fixtures/deployment.json");
    const SCRIPT: &str = include_str!("../fixtures/script.json");

    fn deployed() -> Host {
        Host::deploy(DeploymentConfig::from_json(DEPLOYMENT).unwrap()).unwrap()
    }

    #[test]
    fn fixture_script_replays_with_expected_outcomes() {
        let mut host = deployed();
        let calls = script::parse(SCRIPT).unwrap();
        let report = host.run(&calls);

        assert_eq!(report.symbol, "BCO");
        assert_eq!(report.accepted, 5);
        assert_eq!(report.rejected, 3);
        let errors: Vec<ErrorKind> = report.rejections.iter().map(|r| r.error).collect();
        assert_eq!(
            errors,
            vec![
                ErrorKind::Unauthorized,
                ErrorKind::InsufficientBalance,
                ErrorKind::Overflow,
            ]
        );
        assert_eq!(report.total_supply, 1_000);
        assert_eq!(report.next_seq, 6);
        assert!(report.conserved);
        assert_eq!(report.state_digest, host.engine().snapshot().digest());
    }

    #[test]
    fn deploy_rejects_invalid_token_metadata() {
        let raw = r#"{
            "token": { "metadata": { "name": "", "symbol": "BCO", "decimals": 0 } },
            "genesis": { "admin": "0xaa", "initial_supply": 1 }
        }"#;
        assert!(DeploymentConfig::from_json(raw).is_err());
    }

    #[test]
    fn deploy_fails_when_genesis_exceeds_cap() {
        let raw = r#"{
            "token": { "policy": { "supply_cap": 10 } },
            "genesis": { "admin": "0xaa", "initial_supply": 11 }
        }"#;
        let config = DeploymentConfig::from_json(raw).unwrap();
        assert!(Host::deploy(config).is_err());
    }

    #[test]
    fn set_admin_call_accepts_missing_new_admin() {
        let calls = script::parse(r#"[{ "op": "set_admin", "caller": "0xaa", "height": 3 }]"#)
            .unwrap();
        assert_eq!(calls[0].op, Operation::SetAdmin { new_admin: None });
        assert_eq!(calls[0].caller, "aa".parse::<AccountId>().unwrap());
    }

    #[test]
    fn export_writes_one_json_document_per_line() {
        let mut host = deployed();
        let report = host.run(&script::parse(SCRIPT).unwrap());
        let mut out = Vec::new();
        host.export(&mut out, 2, &report).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0]["seq"], 2);
        assert_eq!(lines[3]["kind"], "admin_changed");
        assert_eq!(lines[4]["accepted"], 5);
        assert_eq!(lines[4]["state_digest"], report.state_digest.as_str());
    }

    #[test]
    fn metrics_reflect_replayed_calls() {
        let mut host = deployed();
        host.run(&script::parse(SCRIPT).unwrap());
        let text = host.render_metrics().unwrap();
        assert!(text.contains("carbon_token_total_supply 1000"));
        assert!(text.contains("carbon_token_conservation_ok 1"));
        assert!(text.contains(r#"carbon_token_rejections_total{error="overflow"} 1"#));
    }
}
