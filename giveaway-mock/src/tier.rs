use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use giveaway_core::{ExpirationTier, GiveawayError, ListingContext, TierOutcome};

use crate::MockBehavior;

/// Resolution tier with scripted output and a call counter.
pub struct MockTier {
    name: &'static str,
    behavior: MockBehavior<TierOutcome>,
    inline: bool,
    requires: Option<TierOutcome>,
    calls: AtomicUsize,
}

impl MockTier {
    /// A network tier that behaves as scripted.
    #[must_use]
    pub const fn new(name: &'static str, behavior: MockBehavior<TierOutcome>) -> Self {
        Self {
            name,
            behavior,
            inline: false,
            requires: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A network tier that immediately returns `outcome`.
    #[must_use]
    pub const fn returning(name: &'static str, outcome: TierOutcome) -> Self {
        Self::new(name, MockBehavior::Return(outcome))
    }

    /// Mark this tier as inline (no I/O).
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Only run when the previous tier reported `outcome`.
    #[must_use]
    pub fn only_after(mut self, outcome: TierOutcome) -> Self {
        self.requires = Some(outcome);
        self
    }

    /// Number of `attempt` calls observed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExpirationTier for MockTier {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_inline(&self) -> bool {
        self.inline
    }

    fn reachable_after(&self, previous: Option<&TierOutcome>) -> bool {
        self.requires.is_none_or(|req| previous == Some(&req))
    }

    async fn attempt(&self, _ctx: &ListingContext) -> Result<TierOutcome, GiveawayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Return(o) => Ok(*o),
            MockBehavior::After(d, o) => {
                tokio::time::sleep(*d).await;
                Ok(*o)
            }
            MockBehavior::Fail(e) => Err(e.clone()),
            MockBehavior::Hang => std::future::pending().await,
        }
    }
}
