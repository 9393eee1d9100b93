use std::sync::Arc;
use std::time::Duration;

use giveaway::{
    ExpirationResolver, ExpirationTier, FinderConfig, GiveawayError, ListingContext, NO_EXPIRATION,
    Platform,
};
use giveaway_mock::{DynamicMockAdapter, MockBehavior, MockItem, MockTier};

use crate::helpers::{SHORT, cfg_with, finder, listing};

#[tokio::test]
async fn adapter_failure_fails_the_call() {
    let (ok, ok_ctrl) = DynamicMockAdapter::new_with_controller("ok", Platform::EpicGames);
    ok_ctrl
        .set_fetch_behavior(MockBehavior::Return(vec![MockItem::Ready(listing(
            "Game 1",
            Platform::EpicGames,
        ))]))
        .await;
    let (bad, bad_ctrl) = DynamicMockAdapter::new_with_controller("bad", Platform::Steam);
    bad_ctrl
        .set_fetch_behavior(MockBehavior::Fail(GiveawayError::source_retrieval(
            "steam", "503",
        )))
        .await;

    let g = finder(
        cfg_with(&[Platform::EpicGames, Platform::Steam]),
        vec![ok, bad],
    );
    let err = g.retrieve().await.unwrap_err();
    match err {
        GiveawayError::SourceRetrieval { platform, msg } => {
            assert_eq!(platform, "steam");
            assert_eq!(msg, "503");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn foreign_adapter_errors_are_tagged_with_platform() {
    let (bad, ctrl) = DynamicMockAdapter::new_with_controller("bad", Platform::EpicGames);
    ctrl.set_fetch_behavior(MockBehavior::Fail(GiveawayError::Data(
        "missing elements".into(),
    )))
    .await;

    let g = finder(cfg_with(&[Platform::EpicGames]), vec![bad]);
    let err = g.retrieve().await.unwrap_err();
    assert!(matches!(
        err,
        GiveawayError::SourceRetrieval { ref platform, .. } if platform == "epic-games"
    ));
}

#[tokio::test]
async fn single_pending_failure_fails_the_call() {
    let (a, ctrl) = DynamicMockAdapter::new_with_controller("a", Platform::Steam);
    ctrl.set_fetch_behavior(MockBehavior::Return(vec![
        MockItem::Ready(listing("Ready", Platform::Steam)),
        MockItem::pending(listing("Fine", Platform::Steam), SHORT, 1_900_000_000),
        MockItem::FailingPending {
            label: "Broken".into(),
            error: GiveawayError::Other("boom".into()),
        },
    ]))
    .await;

    let g = finder(cfg_with(&[Platform::Steam]), vec![a]);
    let err = g.retrieve().await.unwrap_err();
    match err {
        GiveawayError::PendingFailed {
            platform, listing, ..
        } => {
            assert_eq!(platform, "steam");
            assert_eq!(listing, "Broken");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn several_pending_failures_are_aggregated() {
    let (a, ca) = DynamicMockAdapter::new_with_controller("a", Platform::Steam);
    ca.set_fetch_behavior(MockBehavior::Return(vec![MockItem::FailingPending {
        label: "S".into(),
        error: GiveawayError::Other("x".into()),
    }]))
    .await;
    let (b, cb) = DynamicMockAdapter::new_with_controller("b", Platform::EpicGames);
    cb.set_fetch_behavior(MockBehavior::Return(vec![MockItem::FailingPending {
        label: "E".into(),
        error: GiveawayError::Other("y".into()),
    }]))
    .await;

    let g = finder(FinderConfig::default(), vec![a, b]);
    let err = g.retrieve().await.unwrap_err();
    let flat = err.flatten();
    assert_eq!(flat.len(), 2);
    assert!(
        flat.iter()
            .all(|e| matches!(e, GiveawayError::PendingFailed { .. }))
    );
}

#[tokio::test(start_paused = true)]
async fn resolution_timeout_only_degrades_the_listing() {
    let slow = Arc::new(MockTier::new("slow", MockBehavior::Hang));
    let resolver = Arc::new(ExpirationResolver::new(
        vec![slow.clone() as Arc<dyn ExpirationTier>],
        Duration::from_millis(200),
    ));

    let (a, ctrl) = DynamicMockAdapter::new_with_controller("a", Platform::Steam);
    ctrl.set_resolver(resolver).await;
    ctrl.set_fetch_behavior(MockBehavior::Return(vec![MockItem::Resolve(
        listing("Slow Game", Platform::Steam),
        ListingContext {
            title: "Slow Game".into(),
            ..ListingContext::default()
        },
    )]))
    .await;

    let g = finder(cfg_with(&[Platform::Steam]), vec![a]);
    let out = g.retrieve().await.unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].title, "Slow Game");
    assert_eq!(out[0].expiration_epoch, NO_EXPIRATION);
    assert_eq!(slow.calls(), 1);
}
