use giveaway_core::{GiveawayError, Listing};

/// Consumer of callback-mode deliveries.
///
/// Implementations are called from Tokio worker tasks, possibly from several
/// adapters at once, so they must be `Send + Sync` and should return quickly.
/// No ordering holds across adapters. Within one adapter, the ready batch is
/// delivered before the batch of resolved pending listings.
pub trait ListingSink: Send + Sync {
    /// Receive a non-empty batch of listings. The batch is owned by the sink.
    fn on_listings(&self, batch: Vec<Listing>);

    /// Receive one error. Never preceded or followed by any particular delivery.
    fn on_error(&self, cause: GiveawayError);
}

/// [`ListingSink`] backed by a pair of closures.
pub struct FnSink<L, E> {
    on_listings: L,
    on_error: E,
}

impl<L, E> FnSink<L, E>
where
    L: Fn(Vec<Listing>) + Send + Sync,
    E: Fn(GiveawayError) + Send + Sync,
{
    /// Wrap `on_listings` and `on_error` into a sink.
    pub const fn new(on_listings: L, on_error: E) -> Self {
        Self {
            on_listings,
            on_error,
        }
    }
}

impl<L, E> ListingSink for FnSink<L, E>
where
    L: Fn(Vec<Listing>) + Send + Sync,
    E: Fn(GiveawayError) + Send + Sync,
{
    fn on_listings(&self, batch: Vec<Listing>) {
        (self.on_listings)(batch);
    }

    fn on_error(&self, cause: GiveawayError) {
        (self.on_error)(cause);
    }
}
