use std::sync::Arc;
use std::time::Duration;

use giveaway::Platform;
use giveaway_mock::{DynamicMockAdapter, MockAdapter, MockBehavior, MockItem};

use crate::helpers::{Delivery, RecordingSink, cfg_with, finder, listing};

fn position_of(events: &[Delivery], title: &str) -> usize {
    events
        .iter()
        .position(|d| matches!(d, Delivery::Listings(b) if b.iter().any(|l| l.title == title)))
        .unwrap_or_else(|| panic!("{title} never delivered"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ready_batch_precedes_pending_batch_per_adapter() {
    let (a, ca) = DynamicMockAdapter::new_with_controller("a", Platform::Steam);
    ca.set_fetch_behavior(MockBehavior::Return(vec![
        MockItem::pending(
            listing("A pending", Platform::Steam),
            Duration::from_millis(5),
            1_900_000_000,
        ),
        MockItem::Ready(listing("A ready", Platform::Steam)),
    ]))
    .await;
    let (b, cb) = DynamicMockAdapter::new_with_controller("b", Platform::EpicGames);
    cb.set_fetch_behavior(MockBehavior::After(
        Duration::from_millis(2),
        vec![
            MockItem::Ready(listing("B ready 1", Platform::EpicGames)),
            MockItem::Ready(listing("B ready 2", Platform::EpicGames)),
            MockItem::pending(
                listing("B pending", Platform::EpicGames),
                Duration::from_millis(1),
                1_900_000_000,
            ),
        ],
    ))
    .await;

    let g = finder(
        cfg_with(&[Platform::Steam, Platform::EpicGames]),
        vec![a, b],
    );
    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;

    let events = sink.events();
    assert_eq!(events.len(), 4);
    assert!(position_of(&events, "A ready") < position_of(&events, "A pending"));
    assert!(position_of(&events, "B ready 1") < position_of(&events, "B pending"));
    assert_eq!(
        position_of(&events, "B ready 1"),
        position_of(&events, "B ready 2")
    );
}

#[tokio::test]
async fn deliveries_are_never_empty() {
    let (only_pending, c) = DynamicMockAdapter::new_with_controller("p", Platform::Steam);
    c.set_fetch_behavior(MockBehavior::Return(vec![MockItem::pending(
        listing("Late", Platform::Steam),
        Duration::from_millis(1),
        1_900_000_000,
    )]))
    .await;
    let (empty, _ce) = DynamicMockAdapter::new_with_controller("e", Platform::EpicGames);

    let g = finder(
        cfg_with(&[Platform::Steam, Platform::EpicGames]),
        vec![only_pending, empty],
    );
    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;

    let batches = sink.batches();
    assert_eq!(batches.len(), 1);
    assert!(batches.iter().all(|b| !b.is_empty()));
    assert!(sink.errors().is_empty());
}

#[tokio::test]
async fn mock_fixtures_arrive_in_two_batches() {
    let g = finder(
        cfg_with(&[Platform::EpicGames]),
        vec![Arc::new(MockAdapter::new(Platform::EpicGames))],
    );
    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;

    let batches = sink.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0][0].title, "Game 1");
    assert_eq!(batches[1][0].title, "Game 2");
}
