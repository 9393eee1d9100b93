use std::sync::Arc;
use std::time::Duration;

use giveaway::{FinderConfig, GiveawayError, Platform};
use giveaway_mock::{DynamicMockAdapter, MockBehavior, MockItem};

use crate::helpers::{RecordingSink, cfg_with, finder, listing, set, titles};

fn bounded(ms: u64) -> FinderConfig {
    FinderConfig {
        adapter_timeout: Some(Duration::from_millis(ms)),
        ..cfg_with(&[Platform::Steam, Platform::EpicGames])
    }
}

#[tokio::test(start_paused = true)]
async fn hanging_adapter_times_out_in_blocking_mode() {
    let (stuck, cs) = DynamicMockAdapter::new_with_controller("stuck", Platform::Steam);
    cs.set_fetch_behavior(MockBehavior::Hang).await;

    let g = finder(bounded(100), vec![stuck]);
    let err = g.retrieve().await.unwrap_err();
    match err {
        GiveawayError::AdapterTimeout {
            platform,
            timeout_ms,
        } => {
            assert_eq!(platform, "steam");
            assert_eq!(timeout_ms, 100);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn hanging_adapter_times_out_in_callback_mode() {
    let (stuck, cs) = DynamicMockAdapter::new_with_controller("stuck", Platform::Steam);
    cs.set_fetch_behavior(MockBehavior::Hang).await;
    let (ok, co) = DynamicMockAdapter::new_with_controller("ok", Platform::EpicGames);
    co.set_fetch_behavior(MockBehavior::After(
        Duration::from_millis(20),
        vec![MockItem::Ready(listing("On time", Platform::EpicGames))],
    ))
    .await;

    let g = finder(bounded(100), vec![stuck, ok]);
    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;

    assert_eq!(titles(&sink.listings()), set(&["On time"]));
    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], GiveawayError::AdapterTimeout { .. }));
}

#[tokio::test(start_paused = true)]
async fn adapter_within_bound_is_unaffected() {
    let (ok, co) = DynamicMockAdapter::new_with_controller("ok", Platform::Steam);
    co.set_fetch_behavior(MockBehavior::After(
        Duration::from_millis(50),
        vec![MockItem::Ready(listing("Made it", Platform::Steam))],
    ))
    .await;

    let g = finder(bounded(100), vec![ok]);
    let out = g.retrieve().await.unwrap();
    assert_eq!(titles(&out), set(&["Made it"]));
}
