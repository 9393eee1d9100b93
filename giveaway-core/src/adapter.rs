use async_trait::async_trait;

use crate::{GiveawayError, PartialResult, Platform};

/// A storefront connector producing partial results for one platform.
///
/// Adapters are invoked at most once per orchestrator run and must not share
/// mutable state with each other. Everything they need (locale, DLC policy,
/// timeouts) is handed to them at construction time.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// A stable identifier for logs and duplicate detection (e.g. "giveaway-steam").
    fn name(&self) -> &'static str;

    /// The storefront this adapter reads from. Must not perform I/O.
    fn platform(&self) -> Platform;

    /// Fetch the current free listings.
    ///
    /// Listings whose expiration is already known come back as
    /// [`PartialResult::Ready`]; listings that still need network lookups come
    /// back as [`PartialResult::Pending`] and are driven by the caller.
    ///
    /// # Errors
    /// Returns `SourceRetrieval` (or another non-recoverable error) when the
    /// primary data could not be obtained or parsed. This only affects this
    /// adapter's contribution to a run.
    async fn fetch(&self) -> Result<Vec<PartialResult>, GiveawayError>;
}
