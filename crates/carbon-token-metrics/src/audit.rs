use crate::TokenMetrics;
use carbon_token_core::TokenEngine;

/// Checks `total_supply == Σ balances` on the engine, publishes the result
/// and refreshes the supply gauges. Returns whether the ledger is conserved.
pub fn audit_conservation(metrics: &TokenMetrics, engine: &TokenEngine) -> bool {
    let conserved = engine.ledger().is_conserved();
    metrics.observe_engine(engine);
    metrics.conservation_ok.set(i64::from(conserved));
    conserved
}
