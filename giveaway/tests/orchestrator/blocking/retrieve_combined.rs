use std::sync::Arc;

use giveaway::{NO_EXPIRATION, Platform, SourceAdapter};
use giveaway_mock::{DynamicMockAdapter, MockAdapter, MockBehavior, MockItem};

use crate::helpers::{SHORT, cfg_with, finder, listing, set, titles};

#[tokio::test]
async fn ready_and_pending_are_combined() {
    let (epic, ctrl) = DynamicMockAdapter::new_with_controller("epic", Platform::EpicGames);
    ctrl.set_fetch_behavior(MockBehavior::Return(vec![
        MockItem::Ready(listing("Game 1", Platform::EpicGames)),
        MockItem::pending(listing("Game 2", Platform::EpicGames), SHORT, 1_900_000_000),
    ]))
    .await;

    let g = finder(cfg_with(&[Platform::EpicGames]), vec![epic]);
    let out = g.retrieve().await.unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(titles(&out), set(&["Game 1", "Game 2"]));
    assert!(out.iter().all(|l| l.platform == Platform::EpicGames));
}

#[tokio::test]
async fn ready_listings_precede_pending_across_adapters() {
    let epic: Arc<dyn SourceAdapter> = Arc::new(MockAdapter::new(Platform::EpicGames));
    let steam: Arc<dyn SourceAdapter> = Arc::new(MockAdapter::new(Platform::Steam));

    let g = finder(
        cfg_with(&[Platform::EpicGames, Platform::Steam]),
        vec![epic, steam],
    );
    let out = g.retrieve().await.unwrap();
    let order: Vec<&str> = out.iter().map(|l| l.title.as_str()).collect();

    assert_eq!(order, ["Game 1", "Soundtrack DLC", "Game 2", "Space Game"]);
}

#[tokio::test]
async fn every_listing_has_epoch_or_sentinel() {
    let mut stale = listing("Stale", Platform::Steam);
    stale.expiration_epoch = 0;
    let mut negative = listing("Negative", Platform::Steam);
    negative.expiration_epoch = -42;

    let (steam, ctrl) = DynamicMockAdapter::new_with_controller("steam", Platform::Steam);
    ctrl.set_fetch_behavior(MockBehavior::Return(vec![
        MockItem::Ready(stale),
        MockItem::Ready(negative),
        MockItem::pending(listing("Zero", Platform::Steam), SHORT, 0),
        MockItem::pending(listing("Real", Platform::Steam), SHORT, 1_700_000_000),
    ]))
    .await;

    let g = finder(cfg_with(&[Platform::Steam]), vec![steam]);
    let out = g.retrieve().await.unwrap();

    assert_eq!(out.len(), 4);
    for l in &out {
        assert!(
            l.expiration_epoch > 0 || l.expiration_epoch == NO_EXPIRATION,
            "{} has {}",
            l.title,
            l.expiration_epoch
        );
    }
    let real = out.iter().find(|l| l.title == "Real").unwrap();
    assert_eq!(real.expiration_epoch, 1_700_000_000);
}

#[tokio::test]
async fn all_ready_batch_returns_without_join() {
    let (epic, ctrl) = DynamicMockAdapter::new_with_controller("epic", Platform::EpicGames);
    ctrl.set_fetch_behavior(MockBehavior::Return(vec![
        MockItem::Ready(listing("A", Platform::EpicGames)),
        MockItem::Ready(listing("B", Platform::EpicGames)),
    ]))
    .await;

    let g = finder(cfg_with(&[Platform::EpicGames]), vec![epic]);
    let out = g.retrieve().await.unwrap();
    let order: Vec<&str> = out.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(order, ["A", "B"]);
}

#[tokio::test]
async fn empty_adapters_yield_empty_result() {
    let (a, _ca) = DynamicMockAdapter::new_with_controller("a", Platform::Steam);
    let (b, _cb) = DynamicMockAdapter::new_with_controller("b", Platform::EpicGames);
    let g = finder(cfg_with(&[Platform::Steam, Platform::EpicGames]), vec![a, b]);
    assert!(g.retrieve().await.unwrap().is_empty());
}
