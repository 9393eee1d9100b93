use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use giveaway_core::{
    ExpirationResolver, GiveawayError, Listing, ListingContext, PartialResult, Platform,
    SourceAdapter,
};

/// Instruction for how a call should behave.
#[derive(Clone, Debug)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Sleep for the given duration, then return the value.
    After(Duration, T),
    /// Fail immediately with the provided error.
    Fail(GiveawayError),
    /// Hang indefinitely (simulate a stalled source).
    Hang,
}

/// One scripted entry of a mock fetch.
///
/// Partial results own futures and cannot be cloned, so the mock keeps a
/// script and builds fresh results on every call.
#[derive(Clone, Debug)]
pub enum MockItem {
    /// A listing that is already complete.
    Ready(Listing),
    /// A listing that completes after `delay` with `epoch` as its expiration.
    Pending {
        /// The listing to produce.
        listing: Listing,
        /// Simulated resolution latency.
        delay: Duration,
        /// Expiration written into the listing on completion.
        epoch: i64,
    },
    /// Pending work that fails with `error`.
    FailingPending {
        /// Label of the pending listing.
        label: String,
        /// Error produced on completion.
        error: GiveawayError,
    },
    /// A listing handed to the adapter's expiration resolver via `prepare`.
    Resolve(Listing, ListingContext),
}

impl MockItem {
    /// Shorthand for a pending listing that resolves after `delay`.
    #[must_use]
    pub fn pending(listing: Listing, delay: Duration, epoch: i64) -> Self {
        Self::Pending {
            listing,
            delay,
            epoch,
        }
    }
}

struct InternalState {
    fetch: MockBehavior<Vec<MockItem>>,
    fetch_calls: usize,
    resolver: Option<Arc<ExpirationResolver>>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set what the next `fetch` calls return.
    pub async fn set_fetch_behavior(&self, behavior: MockBehavior<Vec<MockItem>>) {
        let mut guard = self.state.lock().await;
        guard.fetch = behavior;
    }

    /// Install the resolver used for [`MockItem::Resolve`] entries.
    pub async fn set_resolver(&self, resolver: Arc<ExpirationResolver>) {
        let mut guard = self.state.lock().await;
        guard.resolver = Some(resolver);
    }

    /// Number of `fetch` calls observed so far.
    pub async fn fetch_calls(&self) -> usize {
        self.state.lock().await.fetch_calls
    }
}

/// Source adapter whose behavior is scripted at runtime through a controller.
pub struct DynamicMockAdapter {
    name: &'static str,
    platform: Platform,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockAdapter {
    /// Create a mock adapter and the controller that drives it.
    ///
    /// The adapter starts out returning an empty batch.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
        platform: Platform,
    ) -> (Arc<Self>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState {
            fetch: MockBehavior::Return(Vec::new()),
            fetch_calls: 0,
            resolver: None,
        }));
        let adapter = Arc::new(Self {
            name,
            platform,
            state: Arc::clone(&state),
        });
        (adapter, DynamicMockController { state })
    }

    pub(crate) async fn materialize(
        items: Vec<MockItem>,
        resolver: Option<Arc<ExpirationResolver>>,
    ) -> Vec<PartialResult> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let result = match item {
                MockItem::Ready(listing) => PartialResult::Ready(listing),
                MockItem::Pending {
                    mut listing,
                    delay,
                    epoch,
                } => {
                    let label = listing.title.clone();
                    PartialResult::pending(label, async move {
                        tokio::time::sleep(delay).await;
                        listing.expiration_epoch = epoch;
                        Ok(listing)
                    })
                }
                MockItem::FailingPending { label, error } => {
                    PartialResult::pending(label, async move { Err(error) })
                }
                MockItem::Resolve(listing, ctx) => match &resolver {
                    Some(r) => r.prepare(listing, ctx).await,
                    None => PartialResult::Ready(listing),
                },
            };
            out.push(result);
        }
        out
    }
}

#[async_trait]
impl SourceAdapter for DynamicMockAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch(&self) -> Result<Vec<PartialResult>, GiveawayError> {
        let (behavior, resolver) = {
            let mut guard = self.state.lock().await;
            guard.fetch_calls += 1;
            (guard.fetch.clone(), guard.resolver.clone())
        };
        match behavior {
            MockBehavior::Return(items) => Ok(Self::materialize(items, resolver).await),
            MockBehavior::After(delay, items) => {
                tokio::time::sleep(delay).await;
                Ok(Self::materialize(items, resolver).await)
            }
            MockBehavior::Fail(e) => Err(e),
            MockBehavior::Hang => std::future::pending().await,
        }
    }
}
