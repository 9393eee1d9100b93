//! Tiered expiration resolution.
//!
//! A resolver walks an ordered list of [`ExpirationTier`]s and stops at the
//! first definitive answer. Inline tiers (no I/O) run eagerly when a listing
//! is prepared; the rest run later, bounded by a per-listing timeout, and any
//! failure along the way degrades to the `NO_EXPIRATION` sentinel.

use std::sync::Arc;
use std::time::Duration;

use crate::{GiveawayError, Listing, NO_EXPIRATION, PartialResult, PendingListing, Resolved};

pub mod events;
pub mod inline;
pub mod phrase;
pub mod tier;

use tier::{ExpirationTier, ListingContext, TierOutcome};

/// Final answer for one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Positive Unix seconds, or `NO_EXPIRATION`.
    pub epoch: i64,
    /// Tier that produced the answer; `None` when the chain ran out or timed out.
    pub tier: Option<&'static str>,
    /// Recoverable problems hit along the way.
    pub degraded: Vec<GiveawayError>,
}

impl Resolution {
    fn unresolved(degraded: Vec<GiveawayError>) -> Self {
        Self {
            epoch: NO_EXPIRATION,
            tier: None,
            degraded,
        }
    }
}

#[derive(Debug, Default)]
struct ChainState {
    previous: Option<TierOutcome>,
    degraded: Vec<GiveawayError>,
}

/// Ordered tier chain with a per-listing timeout on its network tiers.
pub struct ExpirationResolver {
    tiers: Vec<Arc<dyn ExpirationTier>>,
    timeout: Duration,
}

impl ExpirationResolver {
    /// Create a resolver over `tiers`, tried in order.
    #[must_use]
    pub fn new(tiers: Vec<Arc<dyn ExpirationTier>>, timeout: Duration) -> Self {
        Self { tiers, timeout }
    }

    /// Names of the configured tiers, in order.
    pub fn tier_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tiers.iter().map(|t| t.name())
    }

    /// Bound applied to the network tiers of one listing.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn inline_len(&self) -> usize {
        self.tiers.iter().take_while(|t| t.is_inline()).count()
    }

    /// Run the whole chain for `ctx`.
    ///
    /// Never fails: timeouts and tier errors are returned as degradations and
    /// the epoch falls back to `NO_EXPIRATION`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "giveaway::resolve",
            skip(self, ctx),
            fields(listing = %ctx.title, tiers = self.tiers.len()),
        )
    )]
    pub async fn resolve(&self, ctx: &ListingContext) -> Resolution {
        let split = self.inline_len();
        let mut state = ChainState::default();
        if let Some(res) = self.run_tiers(&self.tiers[..split], ctx, &mut state).await {
            return res;
        }
        self.run_bounded(&self.tiers[split..], ctx, state).await
    }

    /// Resolve what can be resolved without I/O and defer the rest.
    ///
    /// Returns [`PartialResult::Ready`] when an inline tier settles the
    /// expiration or no network tiers are configured, and
    /// [`PartialResult::Pending`] otherwise. The pending work owns a clone of
    /// this resolver and writes the final epoch into `listing`.
    pub async fn prepare(self: &Arc<Self>, mut listing: Listing, ctx: ListingContext) -> PartialResult {
        let split = self.inline_len();
        let mut state = ChainState::default();
        if let Some(res) = self.run_tiers(&self.tiers[..split], &ctx, &mut state).await {
            listing.expiration_epoch = res.epoch;
            return PartialResult::Ready(listing);
        }
        if split == self.tiers.len() {
            listing.expiration_epoch = NO_EXPIRATION;
            return PartialResult::Ready(listing);
        }

        let this = Arc::clone(self);
        let label = listing.title.clone();
        PartialResult::Pending(PendingListing::resolving(label, async move {
            let res = this.run_bounded(&this.tiers[split..], &ctx, state).await;
            listing.expiration_epoch = res.epoch;
            Resolved {
                listing,
                degraded: res.degraded,
            }
        }))
    }

    async fn run_bounded(
        &self,
        tiers: &[Arc<dyn ExpirationTier>],
        ctx: &ListingContext,
        mut state: ChainState,
    ) -> Resolution {
        if tiers.is_empty() {
            return Resolution::unresolved(state.degraded);
        }
        // The chain only borrows `state`, so errors recorded before the
        // deadline survive when the timed future is dropped.
        let outcome =
            tokio::time::timeout(self.timeout, self.run_tiers(tiers, ctx, &mut state)).await;
        match outcome {
            Ok(Some(res)) => res,
            Ok(None) => Resolution::unresolved(state.degraded),
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    listing = %ctx.title,
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "expiration lookup timed out"
                );
                state
                    .degraded
                    .push(GiveawayError::resolution_timeout(&ctx.title, self.timeout));
                Resolution::unresolved(state.degraded)
            }
        }
    }

    async fn run_tiers(
        &self,
        tiers: &[Arc<dyn ExpirationTier>],
        ctx: &ListingContext,
        state: &mut ChainState,
    ) -> Option<Resolution> {
        for tier in tiers {
            if !tier.reachable_after(state.previous.as_ref()) {
                #[cfg(feature = "tracing")]
                tracing::debug!(tier = tier.name(), listing = %ctx.title, "tier not reachable; skipping");
                continue;
            }
            match tier.attempt(ctx).await {
                Ok(TierOutcome::Found(epoch)) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(tier = tier.name(), listing = %ctx.title, epoch, "expiration found");
                    return Some(Resolution {
                        epoch: crate::normalize_epoch(epoch),
                        tier: Some(tier.name()),
                        degraded: std::mem::take(&mut state.degraded),
                    });
                }
                Ok(outcome) => state.previous = Some(outcome),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(tier = tier.name(), listing = %ctx.title, error = %e, "tier failed; continuing");
                    state.degraded.push(e);
                    state.previous = Some(TierOutcome::NotApplicable);
                }
            }
        }
        None
    }
}

impl core::fmt::Debug for ExpirationResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExpirationResolver")
            .field("tiers", &self.tier_names().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish()
    }
}
