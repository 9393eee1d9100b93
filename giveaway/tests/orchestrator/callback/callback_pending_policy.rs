use std::sync::Arc;
use std::time::Duration;

use giveaway::{
    ExpirationResolver, ExpirationTier, FinderConfig, GiveawayError, ListingContext,
    NO_EXPIRATION, PendingFailurePolicy, Platform,
};
use giveaway_mock::{DynamicMockAdapter, DynamicMockController, MockBehavior, MockItem, MockTier};

use crate::helpers::{RecordingSink, SHORT, cfg_with, finder, listing, set, titles};

async fn mixed_batch(ctrl: &DynamicMockController) {
    ctrl.set_fetch_behavior(MockBehavior::Return(vec![
        MockItem::Ready(listing("Ready", Platform::Steam)),
        MockItem::pending(listing("Ok", Platform::Steam), SHORT, 1_900_000_000),
        MockItem::FailingPending {
            label: "Broken".into(),
            error: GiveawayError::Other("boom".into()),
        },
    ]))
    .await;
}

#[tokio::test]
async fn discard_batch_drops_pending_successes() {
    let (a, ctrl) = DynamicMockAdapter::new_with_controller("a", Platform::Steam);
    mixed_batch(&ctrl).await;

    let g = finder(cfg_with(&[Platform::Steam]), vec![a]);
    assert_eq!(g.config().pending_failure, PendingFailurePolicy::DiscardBatch);
    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;

    assert_eq!(titles(&sink.listings()), set(&["Ready"]));
    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        GiveawayError::PendingFailed { listing, .. } if listing == "Broken"
    ));
}

#[tokio::test]
async fn deliver_successes_keeps_completed_pending() {
    let (a, ctrl) = DynamicMockAdapter::new_with_controller("a", Platform::Steam);
    mixed_batch(&ctrl).await;

    let cfg = FinderConfig {
        pending_failure: PendingFailurePolicy::DeliverSuccesses,
        ..cfg_with(&[Platform::Steam])
    };
    let g = finder(cfg, vec![a]);
    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;

    assert_eq!(titles(&sink.listings()), set(&["Ready", "Ok"]));
    assert_eq!(sink.batches().len(), 2);
    assert_eq!(sink.errors().len(), 1);
}

#[tokio::test]
async fn degradations_are_reported_after_delivery() {
    let failing = Arc::new(MockTier::new(
        "package-lookup",
        MockBehavior::Fail(GiveawayError::lookup("package-lookup", "HTTP 500")),
    ));
    let resolver = Arc::new(ExpirationResolver::new(
        vec![failing as Arc<dyn ExpirationTier>],
        Duration::from_secs(1),
    ));

    let (a, ctrl) = DynamicMockAdapter::new_with_controller("a", Platform::Steam);
    ctrl.set_resolver(resolver).await;
    ctrl.set_fetch_behavior(MockBehavior::Return(vec![MockItem::Resolve(
        listing("Degraded", Platform::Steam),
        ListingContext::default(),
    )]))
    .await;

    let g = finder(cfg_with(&[Platform::Steam]), vec![a]);
    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;

    let listings = sink.listings();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].expiration_epoch, NO_EXPIRATION);

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], crate::helpers::Delivery::Listings(_)));
    match &events[1] {
        crate::helpers::Delivery::Error(e) => assert!(e.is_recoverable()),
        other => panic!("unexpected: {other:?}"),
    }
}
