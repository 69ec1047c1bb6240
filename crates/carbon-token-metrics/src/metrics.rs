use carbon_token_core::{Event, TokenEngine, TokenError};
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

pub struct TokenMetrics {
    pub total_supply: IntGauge,
    pub holders: IntGauge,
    pub last_event_seq: IntGauge,
    pub conservation_ok: IntGauge,
    pub events_total: IntCounterVec,
    pub rejections_total: IntCounterVec,
}

impl TokenMetrics {
    /// Creates the collectors and registers them with `registry`.
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        let total_supply = IntGauge::new(
            "carbon_token_total_supply",
            "Total supply of the token in base units",
        )?;
        let holders = IntGauge::new("carbon_token_holders", "Accounts holding a non-zero balance")?;
        let last_event_seq = IntGauge::new(
            "carbon_token_last_event_seq",
            "Sequence number of the newest committed event",
        )?;
        let conservation_ok = IntGauge::new(
            "carbon_token_conservation_ok",
            "1 if total supply equals the sum of balances at the last audit",
        )?;
        let events_total = IntCounterVec::new(
            Opts::new("carbon_token_events_total", "Committed token events"),
            &["kind"],
        )?;
        let rejections_total = IntCounterVec::new(
            Opts::new("carbon_token_rejections_total", "Rejected token operations"),
            &["error"],
        )?;

        registry.register(Box::new(total_supply.clone()))?;
        registry.register(Box::new(holders.clone()))?;
        registry.register(Box::new(last_event_seq.clone()))?;
        registry.register(Box::new(conservation_ok.clone()))?;
        registry.register(Box::new(events_total.clone()))?;
        registry.register(Box::new(rejections_total.clone()))?;

        Ok(Self {
            total_supply,
            holders,
            last_event_seq,
            conservation_ok,
            events_total,
            rejections_total,
        })
    }

    pub fn record_event(&self, event: &Event) {
        self.events_total
            .with_label_values(&[event.kind.label()])
            .inc();
        self.last_event_seq.set(saturating_i64(event.seq));
    }

    pub fn record_rejection(&self, err: &TokenError) {
        self.rejections_total
            .with_label_values(&[err.kind().label()])
            .inc();
    }

    /// Refreshes the gauges from the engine's committed state.
    pub fn observe_engine(&self, engine: &TokenEngine) {
        self.total_supply.set(saturating_i64(engine.total_supply()));
        self.holders.set(saturating_i64(engine.ledger().holders() as u64));
        if let Some(last) = engine.events().last() {
            self.last_event_seq.set(saturating_i64(last.seq));
        }
    }

    /// Text exposition of everything in `registry`.
    pub fn render(registry: &Registry) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

// Prometheus integer gauges are signed; supplies above i64::MAX are pinned.
fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
