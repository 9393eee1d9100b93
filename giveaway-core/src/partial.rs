use core::fmt;
use std::future::{Future, IntoFuture};

use futures::future::BoxFuture;

use crate::{GiveawayError, Listing};

/// A listing whose asynchronous work has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The completed listing.
    pub listing: Listing,
    /// Recoverable problems hit while completing it (timeouts, failed lookups).
    pub degraded: Vec<GiveawayError>,
}

impl Resolved {
    /// A listing that completed without any degradation.
    #[must_use]
    pub const fn clean(listing: Listing) -> Self {
        Self {
            listing,
            degraded: Vec::new(),
        }
    }
}

/// Outstanding work that will produce exactly one listing.
///
/// Nothing runs until the handle is awaited or spawned, so dropping a pending
/// listing cancels it.
pub struct PendingListing {
    label: String,
    fut: BoxFuture<'static, Result<Resolved, GiveawayError>>,
}

impl PendingListing {
    /// Wrap fallible work that produces a listing.
    pub fn new<F>(label: impl Into<String>, fut: F) -> Self
    where
        F: Future<Output = Result<Listing, GiveawayError>> + Send + 'static,
    {
        Self {
            label: label.into(),
            fut: Box::pin(async move { fut.await.map(Resolved::clean) }),
        }
    }

    /// Wrap infallible work that may report recoverable degradations.
    pub fn resolving<F>(label: impl Into<String>, fut: F) -> Self
    where
        F: Future<Output = Resolved> + Send + 'static,
    {
        Self {
            label: label.into(),
            fut: Box::pin(async move { Ok(fut.await) }),
        }
    }

    /// Human-readable label used in errors, usually the listing title.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl IntoFuture for PendingListing {
    type Output = Result<Resolved, GiveawayError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.fut
    }
}

impl fmt::Debug for PendingListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingListing")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// What an adapter returns for one listing: either finished or still resolving.
#[derive(Debug)]
pub enum PartialResult {
    /// Resolution already complete.
    Ready(Listing),
    /// Outstanding work that will produce the listing.
    Pending(PendingListing),
}

impl PartialResult {
    /// Shorthand for a pending result built from fallible work.
    pub fn pending<F>(label: impl Into<String>, fut: F) -> Self
    where
        F: Future<Output = Result<Listing, GiveawayError>> + Send + 'static,
    {
        Self::Pending(PendingListing::new(label, fut))
    }

    /// True for [`PartialResult::Ready`].
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl From<Listing> for PartialResult {
    fn from(listing: Listing) -> Self {
        Self::Ready(listing)
    }
}

impl From<PendingListing> for PartialResult {
    fn from(pending: PendingListing) -> Self {
        Self::Pending(pending)
    }
}
