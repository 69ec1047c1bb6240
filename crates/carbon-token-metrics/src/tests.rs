use crate::{audit_conservation, TokenMetrics};
use carbon_token_core::{AccountId, CallContext, TokenEngine};
use prometheus::Registry;

fn account(byte: u8) -> AccountId {
    AccountId::from_bytes(vec![byte; 32])
}

#[test]
fn metrics_follow_engine_activity() {
    let registry = Registry::new();
    let metrics = TokenMetrics::new(&registry).unwrap();
    let (admin, holder) = (account(1), account(2));

    let mut engine = TokenEngine::default();
    engine.initialize(0, admin.clone(), 1_000).unwrap();
    engine
        .mint(&CallContext::new(admin.clone(), 1), holder.clone(), 250)
        .unwrap();
    engine.burn(&CallContext::new(holder.clone(), 2), 50).unwrap();
    for event in engine.events().iterate(0) {
        metrics.record_event(event);
    }
    let err = engine
        .mint(&CallContext::new(holder, 3), admin, 1)
        .unwrap_err();
    metrics.record_rejection(&err);

    assert!(audit_conservation(&metrics, &engine));
    assert_eq!(metrics.total_supply.get(), 1_200);
    assert_eq!(metrics.holders.get(), 2);
    assert_eq!(metrics.last_event_seq.get(), 2);
    assert_eq!(metrics.conservation_ok.get(), 1);
    assert_eq!(metrics.events_total.with_label_values(&["mint"]).get(), 2);
    assert_eq!(metrics.events_total.with_label_values(&["burn"]).get(), 1);
    assert_eq!(
        metrics
            .rejections_total
            .with_label_values(&["unauthorized"])
            .get(),
        1
    );
}

#[test]
fn render_exposes_registered_series() {
    let registry = Registry::new();
    let metrics = TokenMetrics::new(&registry).unwrap();
    let mut engine = TokenEngine::default();
    engine.initialize(0, account(1), 42).unwrap();
    metrics.observe_engine(&engine);

    let text = TokenMetrics::render(&registry).unwrap();
    assert!(text.contains("carbon_token_total_supply 42"));
    assert!(text.contains("carbon_token_holders 1"));
}

#[test]
fn registering_twice_on_one_registry_fails() {
    let registry = Registry::new();
    let _first = TokenMetrics::new(&registry).unwrap();
    assert!(TokenMetrics::new(&registry).is_err());
}

#[test]
fn separate_registries_hold_independent_metrics() {
    let (left_registry, right_registry) = (Registry::new(), Registry::new());
    let left = TokenMetrics::new(&left_registry).unwrap();
    let right = TokenMetrics::new(&right_registry).unwrap();
    left.total_supply.set(5);
    assert_eq!(right.total_supply.get(), 0);
}
