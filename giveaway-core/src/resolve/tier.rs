use async_trait::async_trait;

use crate::{GiveawayError, Listing};

/// Result of one resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierOutcome {
    /// Definitive answer. `Found(NO_EXPIRATION)` means the promotion is known
    /// to be open-ended and stops the chain just like a real epoch does.
    Found(i64),
    /// The tier had no data for this listing; try the next one.
    NotApplicable,
    /// The tier has data but it does not settle the question (for example a
    /// discount end time reported as zero); try the next one.
    Indeterminate,
}

impl TierOutcome {
    /// True for [`TierOutcome::Found`].
    #[must_use]
    pub const fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A discount advertised inline by a source's primary response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InlineDiscount {
    /// Discount amount in minor units.
    pub amount: Option<i64>,
    /// Discount end as Unix seconds.
    pub end_epoch: Option<i64>,
}

/// Identifiers and inline data the resolution tiers may need for one listing.
///
/// Not every field is present for every source; tiers report
/// [`TierOutcome::NotApplicable`] when theirs is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingContext {
    /// Title of the listing, used for labels and errors.
    pub title: String,
    /// Source-specific listing id (e.g. a Steam app id).
    pub listing_id: Option<String>,
    /// Purchasable package id carrying the discount.
    pub package_id: Option<String>,
    /// Bundle id, when the listing is a bundle.
    pub bundle_id: Option<String>,
    /// Publisher or clan id whose promotional events may cover the listing.
    pub publisher_id: Option<String>,
    /// Canonical store page.
    pub url: Option<String>,
    /// Full (undiscounted) price in minor units.
    pub full_price: Option<i64>,
    /// Discounts active according to the primary response.
    pub inline_discounts: Vec<InlineDiscount>,
}

impl ListingContext {
    /// Start a context from a listing's title and URL.
    #[must_use]
    pub fn for_listing(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            url: (!listing.url.is_empty()).then(|| listing.url.clone()),
            ..Self::default()
        }
    }
}

/// One strategy in the ordered expiration-resolution chain.
#[async_trait]
pub trait ExpirationTier: Send + Sync {
    /// Stable identifier for logs and errors (e.g. "package-lookup").
    fn name(&self) -> &'static str;

    /// Whether this tier works purely on [`ListingContext`] data without I/O.
    ///
    /// Leading inline tiers run before a listing is handed back by its adapter;
    /// the remaining tiers run later under the resolution timeout.
    fn is_inline(&self) -> bool {
        false
    }

    /// Whether this tier should run given the outcome of the last tier that ran.
    ///
    /// `previous` is `None` when no tier has run yet. Failed tiers count as
    /// [`TierOutcome::NotApplicable`].
    fn reachable_after(&self, previous: Option<&TierOutcome>) -> bool {
        let _ = previous;
        true
    }

    /// Try to determine the discount end for `ctx`.
    ///
    /// # Errors
    /// A failed lookup is recorded as a recoverable degradation and the chain
    /// moves on to the next tier.
    async fn attempt(&self, ctx: &ListingContext) -> Result<TierOutcome, GiveawayError>;
}
