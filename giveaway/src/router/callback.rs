use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use giveaway_core::{
    FinderConfig, GiveawayError, Listing, MergeOutcome, PendingFailurePolicy, SourceAdapter,
    merge_when_complete, split,
};

use crate::{FnSink, Giveaway, ListingSink, RetrievalHandle};

impl Giveaway {
    /// Retrieve listings from every enabled adapter concurrently, delivering to `sink`.
    ///
    /// Behavior and trade-offs:
    /// - Each enabled adapter runs as an independent Tokio task; a slow or
    ///   failing adapter never holds back the others.
    /// - Per adapter, ready listings are delivered first, then the resolved
    ///   pending listings as a second batch. Empty batches are not delivered.
    /// - Adapter errors (including a panic inside the adapter) go to
    ///   [`ListingSink::on_error`] and end that adapter's run.
    /// - A pending join with failures is handled per
    ///   [`PendingFailurePolicy`]: the default drops the whole pending batch,
    ///   `DeliverSuccesses` keeps the listings that did complete. Each failure
    ///   is reported to `on_error` either way.
    /// - Recoverable expiration degradations are reported to `on_error` after
    ///   the pending delivery; the affected listings were still delivered.
    ///
    /// Must be called from within a Tokio runtime.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "giveaway::retrieve_each",
            skip(self, sink),
            fields(adapters = self.adapters.len()),
        )
    )]
    pub fn retrieve_each(&self, sink: Arc<dyn ListingSink>) -> RetrievalHandle {
        let tasks = self
            .enabled_adapters()
            .into_iter()
            .map(|adapter| {
                let cfg = Arc::clone(&self.cfg);
                let sink = Arc::clone(&sink);
                tokio::spawn(async move {
                    let platform = adapter.platform();
                    let run = drive_adapter(adapter, cfg, Arc::clone(&sink));
                    if AssertUnwindSafe(run).catch_unwind().await.is_err() {
                        sink.on_error(GiveawayError::source_retrieval(
                            platform.as_str(),
                            "adapter task panicked",
                        ));
                    }
                })
            })
            .collect();
        RetrievalHandle::new(tasks)
    }

    /// Closure flavor of [`Giveaway::retrieve_each`].
    pub fn retrieve_with<L, E>(&self, on_listings: L, on_error: E) -> RetrievalHandle
    where
        L: Fn(Vec<Listing>) + Send + Sync + 'static,
        E: Fn(GiveawayError) + Send + Sync + 'static,
    {
        self.retrieve_each(Arc::new(FnSink::new(on_listings, on_error)))
    }
}

#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "giveaway::adapter_run",
        skip(adapter, cfg, sink),
        fields(adapter = adapter.name(), platform = %adapter.platform()),
    )
)]
async fn drive_adapter(
    adapter: Arc<dyn SourceAdapter>,
    cfg: Arc<FinderConfig>,
    sink: Arc<dyn ListingSink>,
) {
    let batch =
        match Giveaway::adapter_call_with_timeout(adapter.as_ref(), cfg.adapter_timeout).await {
            Ok(batch) => batch,
            Err(e) => {
                sink.on_error(e);
                return;
            }
        };

    let (ready, pending) = split(batch);
    if !ready.is_empty() {
        sink.on_listings(ready);
    }
    if pending.is_empty() {
        return;
    }

    let MergeOutcome {
        listings,
        degraded,
        failures,
    } = merge_when_complete(adapter.platform(), pending).await;

    let deliver =
        failures.is_empty() || cfg.pending_failure == PendingFailurePolicy::DeliverSuccesses;
    if !deliver {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            dropped = listings.len(),
            failed = failures.len(),
            "discarding pending batch"
        );
    } else if !listings.is_empty() {
        sink.on_listings(listings);
    }
    for e in failures.into_iter().chain(degraded) {
        sink.on_error(e);
    }
}
