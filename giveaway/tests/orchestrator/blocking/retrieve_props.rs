use std::sync::Arc;
use std::time::Duration;

use giveaway::{Platform, SourceAdapter};
use giveaway_mock::{DynamicMockAdapter, MockBehavior, MockItem};
use proptest::prelude::*;

use crate::helpers::{cfg_with, finder, listing};

// (ready, pending) counts per adapter
fn adapters_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..4, 0usize..4), 1..4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn blocking_call_returns_every_listing(shape in adapters_strategy()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        let (titles, out) = rt.block_on(async {
            let mut adapters: Vec<Arc<dyn SourceAdapter>> = Vec::new();
            let mut expected = Vec::new();
            for (i, (ready, pending)) in shape.iter().enumerate() {
                let name: &'static str = ["a0", "a1", "a2", "a3"][i];
                let (a, ctrl) = DynamicMockAdapter::new_with_controller(name, Platform::Steam);
                let mut items = Vec::new();
                for r in 0..*ready {
                    let t = format!("{name}-r{r}");
                    expected.push(t.clone());
                    items.push(MockItem::Ready(listing(&t, Platform::Steam)));
                }
                for p in 0..*pending {
                    let t = format!("{name}-p{p}");
                    expected.push(t.clone());
                    items.push(MockItem::pending(
                        listing(&t, Platform::Steam),
                        Duration::from_millis(1),
                        1_900_000_000,
                    ));
                }
                ctrl.set_fetch_behavior(MockBehavior::Return(items)).await;
                adapters.push(a);
            }
            let g = finder(cfg_with(&[Platform::Steam]), adapters);
            (expected, g.retrieve().await.unwrap())
        });

        let mut got: Vec<String> = out.into_iter().map(|l| l.title).collect();
        let mut want = titles;
        got.sort();
        want.sort();
        prop_assert_eq!(got, want);
    }
}
