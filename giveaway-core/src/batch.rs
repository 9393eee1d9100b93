use std::future::IntoFuture;

use futures::future::join_all;

use crate::task::AbortOnDrop;
use crate::{GiveawayError, Listing, PartialResult, PendingListing, Platform};

/// Partition a batch into ready listings and pending handles.
///
/// Pure and order-preserving: each output list keeps the relative order its
/// items had in the input. Ready listings have their expiration normalized so
/// that only positive epochs or the sentinel leave this function.
pub fn split<I>(batch: I) -> (Vec<Listing>, Vec<PendingListing>)
where
    I: IntoIterator<Item = PartialResult>,
{
    let mut ready = Vec::new();
    let mut pending = Vec::new();
    for item in batch {
        match item {
            PartialResult::Ready(listing) => ready.push(listing.normalize_expiration()),
            PartialResult::Pending(handle) => pending.push(handle),
        }
    }
    (ready, pending)
}

/// Result of joining a set of pending listings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Listings that completed, in the order their handles were supplied.
    pub listings: Vec<Listing>,
    /// Recoverable degradations reported by completed listings.
    pub degraded: Vec<GiveawayError>,
    /// Handles that failed outright; their listings are absent from `listings`.
    pub failures: Vec<GiveawayError>,
}

impl MergeOutcome {
    /// True when every handle produced a listing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drive every pending handle to completion as one joined unit.
///
/// Each handle runs as its own Tokio task so a slow listing does not delay the
/// others; the returned future completes once all of them have. Failed handles
/// are reported in [`MergeOutcome::failures`] without discarding their
/// siblings. An empty input returns immediately without spawning anything.
///
/// Dropping the returned future aborts any handle still running.
pub async fn merge_when_complete(platform: Platform, pending: Vec<PendingListing>) -> MergeOutcome {
    if pending.is_empty() {
        return MergeOutcome::default();
    }

    let (labels, tasks): (Vec<String>, Vec<_>) = pending
        .into_iter()
        .map(|p| {
            let label = p.label().to_string();
            (label, AbortOnDrop::spawn(p.into_future()))
        })
        .unzip();

    let results = join_all(tasks).await;

    let mut out = MergeOutcome::default();
    for (label, res) in labels.into_iter().zip(results) {
        match res {
            Ok(Ok(resolved)) => {
                out.listings.push(resolved.listing.normalize_expiration());
                out.degraded.extend(resolved.degraded);
            }
            Ok(Err(e)) => out.failures.push(tag_pending(platform, &label, e)),
            Err(join_err) => {
                let msg = if join_err.is_panic() {
                    "task panicked"
                } else {
                    "task cancelled"
                };
                out.failures
                    .push(GiveawayError::pending_failed(platform.as_str(), label, msg));
            }
        }
    }

    #[cfg(feature = "tracing")]
    if !out.failures.is_empty() {
        tracing::warn!(
            platform = %platform,
            failed = out.failures.len(),
            completed = out.listings.len(),
            "pending join finished with failures"
        );
    }

    out
}

fn tag_pending(platform: Platform, label: &str, e: GiveawayError) -> GiveawayError {
    match e {
        e @ GiveawayError::PendingFailed { .. } => e,
        other => GiveawayError::pending_failed(platform.as_str(), label, other.to_string()),
    }
}
