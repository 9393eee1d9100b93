use std::sync::Arc;

use async_trait::async_trait;
use giveaway::{GiveawayError, PartialResult, Platform, SourceAdapter};
use giveaway_mock::{DynamicMockAdapter, MockBehavior, MockItem};

use crate::helpers::{RecordingSink, SHORT, cfg_with, finder, listing, set, titles};

#[tokio::test]
async fn failing_adapter_does_not_affect_siblings() {
    let (a, ca) = DynamicMockAdapter::new_with_controller("a", Platform::EpicGames);
    ca.set_fetch_behavior(MockBehavior::Fail(GiveawayError::source_retrieval(
        "epic-games",
        "offline",
    )))
    .await;
    let (b, cb) = DynamicMockAdapter::new_with_controller("b", Platform::Steam);
    cb.set_fetch_behavior(MockBehavior::Return(vec![
        MockItem::Ready(listing("B ready", Platform::Steam)),
        MockItem::pending(listing("B pending", Platform::Steam), SHORT, 1_900_000_000),
    ]))
    .await;

    let g = finder(
        cfg_with(&[Platform::EpicGames, Platform::Steam]),
        vec![a, b],
    );
    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;

    assert_eq!(titles(&sink.listings()), set(&["B ready", "B pending"]));
    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        GiveawayError::SourceRetrieval { platform, .. } if platform == "epic-games"
    ));
}

struct PanickingAdapter;

#[async_trait]
impl SourceAdapter for PanickingAdapter {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn platform(&self) -> Platform {
        Platform::Gog
    }

    async fn fetch(&self) -> Result<Vec<PartialResult>, GiveawayError> {
        panic!("adapter bug");
    }
}

#[tokio::test]
async fn panicking_adapter_is_reported_as_error() {
    let (ok, ctrl) = DynamicMockAdapter::new_with_controller("ok", Platform::Steam);
    ctrl.set_fetch_behavior(MockBehavior::Return(vec![MockItem::Ready(listing(
        "Fine",
        Platform::Steam,
    ))]))
    .await;

    let g = finder(
        cfg_with(&[Platform::Steam, Platform::Gog]),
        vec![Arc::new(PanickingAdapter), ok],
    );
    let sink = Arc::new(RecordingSink::default());
    g.retrieve_each(sink.clone()).wait().await;

    assert_eq!(titles(&sink.listings()), set(&["Fine"]));
    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        GiveawayError::SourceRetrieval { platform, msg } if platform == "gog" && msg.contains("panicked")
    ));
}

#[tokio::test]
async fn closure_sink_receives_the_same_deliveries() {
    use std::sync::Mutex;

    let (a, ca) = DynamicMockAdapter::new_with_controller("a", Platform::EpicGames);
    ca.set_fetch_behavior(MockBehavior::Return(vec![MockItem::Ready(listing(
        "Game 1",
        Platform::EpicGames,
    ))]))
    .await;
    let (b, cb) = DynamicMockAdapter::new_with_controller("b", Platform::Steam);
    cb.set_fetch_behavior(MockBehavior::Fail(GiveawayError::source_retrieval(
        "steam", "down",
    )))
    .await;

    let got = Arc::new(Mutex::new(Vec::new()));
    let errs = Arc::new(Mutex::new(Vec::new()));
    let (got_w, errs_w) = (Arc::clone(&got), Arc::clone(&errs));

    let g = finder(
        cfg_with(&[Platform::EpicGames, Platform::Steam]),
        vec![a, b],
    );
    g.retrieve_with(
        move |batch| got_w.lock().unwrap().extend(batch),
        move |e| errs_w.lock().unwrap().push(e),
    )
    .wait()
    .await;

    assert_eq!(titles(&got.lock().unwrap()), set(&["Game 1"]));
    assert_eq!(errs.lock().unwrap().len(), 1);
}
