use giveaway_core::{GiveawayError, Listing, PendingListing, Platform, merge_when_complete, split};

use crate::Giveaway;

impl Giveaway {
    /// Retrieve listings from every enabled adapter and wait for all of them.
    ///
    /// Behavior and trade-offs:
    /// - Adapters are invoked one after another in registration order; their
    ///   ready listings are returned first, in adapter order.
    /// - Pending listings from all adapters are joined once, concurrently, and
    ///   appended after the ready ones.
    /// - Expiration lookups that time out or fail only degrade the listing to
    ///   `NO_EXPIRATION`; they are logged and never fail the call.
    ///
    /// # Errors
    /// Fails on the first adapter error, and fails if any pending listing
    /// cannot be completed. Several pending failures are returned together
    /// as `AllFailed`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "giveaway::retrieve",
            skip(self),
            fields(adapters = self.adapters.len()),
        )
    )]
    pub async fn retrieve(&self) -> Result<Vec<Listing>, GiveawayError> {
        let mut ready: Vec<Listing> = Vec::new();
        let mut pending: Vec<(Platform, Vec<PendingListing>)> = Vec::new();

        for adapter in self.enabled_adapters() {
            let batch =
                Self::adapter_call_with_timeout(adapter.as_ref(), self.cfg.adapter_timeout).await?;
            let (r, p) = split(batch);
            ready.extend(r);
            if !p.is_empty() {
                pending.push((adapter.platform(), p));
            }
        }

        if pending.is_empty() {
            return Ok(ready);
        }

        let joins = pending
            .into_iter()
            .map(|(platform, p)| merge_when_complete(platform, p));
        let outcomes = futures::future::join_all(joins).await;

        let mut failures = Vec::new();
        for outcome in outcomes {
            crate::router::util::log_degraded(&outcome.degraded);
            failures.extend(outcome.failures);
            ready.extend(outcome.listings);
        }

        match GiveawayError::collapse(failures) {
            Some(e) => Err(e),
            None => Ok(ready),
        }
    }
}
