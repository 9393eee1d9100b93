use std::sync::Arc;
use std::time::Duration;

use giveaway::Platform;
use giveaway_mock::{DynamicMockAdapter, MockBehavior, MockItem};

use crate::helpers::{RecordingSink, cfg_with, finder, listing, set, titles};

#[tokio::test(start_paused = true)]
async fn slow_adapter_does_not_stall_others() {
    let (slow, cs) = DynamicMockAdapter::new_with_controller("slow", Platform::Steam);
    cs.set_fetch_behavior(MockBehavior::Hang).await;
    let (fast, cf) = DynamicMockAdapter::new_with_controller("fast", Platform::EpicGames);
    cf.set_fetch_behavior(MockBehavior::Return(vec![MockItem::Ready(listing(
        "Fast",
        Platform::EpicGames,
    ))]))
    .await;

    let g = finder(
        cfg_with(&[Platform::Steam, Platform::EpicGames]),
        vec![slow, fast],
    );
    let sink = Arc::new(RecordingSink::default());
    let handle = g.retrieve_each(sink.clone());
    assert_eq!(handle.len(), 2);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(titles(&sink.listings()), set(&["Fast"]));
    assert!(!handle.is_finished());

    handle.abort();
    tokio::time::timeout(Duration::from_secs(1), handle.wait())
        .await
        .expect("aborted run should finish");
    assert!(sink.errors().is_empty());
}

#[tokio::test]
async fn no_enabled_adapters_yields_an_empty_handle() {
    let (a, ctrl) = DynamicMockAdapter::new_with_controller("a", Platform::Steam);
    let g = finder(cfg_with(&[Platform::EpicGames]), vec![a]);
    let sink = Arc::new(RecordingSink::default());
    let handle = g.retrieve_each(sink.clone());
    assert!(handle.is_empty());
    assert!(handle.is_finished());
    handle.wait().await;
    assert!(sink.events().is_empty());
    assert_eq!(ctrl.fetch_calls().await, 0);
}
