use std::sync::Arc;

use giveaway::Platform;
use giveaway_mock::{DynamicMockAdapter, MockBehavior, MockItem};

use crate::helpers::{RecordingSink, cfg_with, finder, listing, set, titles};

#[tokio::test]
async fn disabled_platform_is_never_invoked() {
    let (steam, cs) = DynamicMockAdapter::new_with_controller("steam", Platform::Steam);
    cs.set_fetch_behavior(MockBehavior::Return(vec![MockItem::Ready(listing(
        "Steam Game",
        Platform::Steam,
    ))]))
    .await;
    let (epic, ce) = DynamicMockAdapter::new_with_controller("epic", Platform::EpicGames);
    ce.set_fetch_behavior(MockBehavior::Return(vec![MockItem::Ready(listing(
        "Epic Game",
        Platform::EpicGames,
    ))]))
    .await;

    let g = finder(cfg_with(&[Platform::EpicGames]), vec![steam, epic]);

    let out = g.retrieve().await.unwrap();
    assert_eq!(titles(&out), set(&["Epic Game"]));

    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;
    assert_eq!(titles(&sink.listings()), set(&["Epic Game"]));

    assert_eq!(cs.fetch_calls().await, 0);
    assert_eq!(ce.fetch_calls().await, 2);
}

#[tokio::test]
async fn nothing_enabled_returns_empty() {
    let (steam, cs) = DynamicMockAdapter::new_with_controller("steam", Platform::Steam);
    let g = finder(cfg_with(&[]), vec![steam]);
    assert!(g.retrieve().await.unwrap().is_empty());
    assert_eq!(cs.fetch_calls().await, 0);
}
