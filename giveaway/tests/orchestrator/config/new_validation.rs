use std::sync::Arc;
use std::time::Duration;

use giveaway::{FinderConfig, Giveaway, GiveawayError, Platform, SourceAdapter};
use giveaway_mock::{DynamicMockAdapter, MockAdapter};

#[test]
fn rejects_empty_adapter_list() {
    let err = Giveaway::new(FinderConfig::default(), vec![]).unwrap_err();
    assert!(matches!(err, GiveawayError::InvalidArg(_)));
}

#[test]
fn rejects_duplicate_adapter_names() {
    let (a, _ca) = DynamicMockAdapter::new_with_controller("same", Platform::Steam);
    let (b, _cb) = DynamicMockAdapter::new_with_controller("same", Platform::EpicGames);
    let err = Giveaway::new(FinderConfig::default(), vec![a, b]).unwrap_err();
    match err {
        GiveawayError::InvalidArg(msg) => assert!(msg.contains("same")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn rejects_zero_resolution_timeout() {
    let cfg = FinderConfig {
        resolution_timeout: Duration::ZERO,
        ..FinderConfig::default()
    };
    let adapter: Arc<dyn SourceAdapter> = Arc::new(MockAdapter::default());
    assert!(Giveaway::new(cfg, vec![adapter]).is_err());
}

#[test]
fn keeps_registration_order_and_config() {
    let epic: Arc<dyn SourceAdapter> = Arc::new(MockAdapter::new(Platform::EpicGames));
    let steam: Arc<dyn SourceAdapter> = Arc::new(MockAdapter::new(Platform::Steam));
    let cfg = FinderConfig {
        include_dlcs: false,
        ..FinderConfig::default()
    };
    let g = Giveaway::new(cfg.clone(), vec![epic, steam]).unwrap();
    assert_eq!(
        g.adapter_names().collect::<Vec<_>>(),
        ["giveaway-mock-epic", "giveaway-mock-steam"]
    );
    assert_eq!(g.config(), &cfg);
}
