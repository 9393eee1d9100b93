use async_trait::async_trait;

use super::tier::{ExpirationTier, ListingContext, TierOutcome};
use crate::GiveawayError;

/// Reads the discount end straight from the primary response.
///
/// Only a discount whose amount equals the full price counts: a second,
/// partial promotion running at the same time must not be mistaken for the
/// 100%-off one.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDiscountTier;

impl InlineDiscountTier {
    /// Stable tier name.
    pub const NAME: &'static str = "inline-discount";

    /// Synchronous core of the tier.
    #[must_use]
    pub fn evaluate(ctx: &ListingContext) -> TierOutcome {
        let Some(full) = ctx.full_price else {
            return TierOutcome::NotApplicable;
        };
        ctx.inline_discounts
            .iter()
            .filter(|d| d.amount == Some(full))
            .find_map(|d| d.end_epoch.filter(|end| *end > 0))
            .map_or(TierOutcome::NotApplicable, TierOutcome::Found)
    }
}

#[async_trait]
impl ExpirationTier for InlineDiscountTier {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_inline(&self) -> bool {
        true
    }

    async fn attempt(&self, ctx: &ListingContext) -> Result<TierOutcome, GiveawayError> {
        Ok(Self::evaluate(ctx))
    }
}
