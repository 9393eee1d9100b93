//! Giveaway aggregates temporarily-free game and DLC listings across storefronts.
//!
//! Overview
//! - Drives source adapters that implement the `giveaway_core::SourceAdapter` contract.
//! - Skips adapters whose platform is disabled in [`FinderConfig`]; they are never invoked.
//! - Splits each adapter's batch into ready listings and pending listings whose
//!   expiration is still being looked up, and joins the pending set without
//!   holding back the ready one.
//! - Normalizes errors into [`GiveawayError`] and isolates them per adapter.
//!
//! Key behaviors and trade-offs
//! - Blocking mode ([`Giveaway::retrieve`]): adapters run one after another,
//!   then a single join waits for every pending listing. Any adapter error or
//!   pending failure fails the whole call, since there is nowhere else to
//!   report it.
//! - Callback mode ([`Giveaway::retrieve_each`], [`Giveaway::retrieve_with`]):
//!   adapters run concurrently as independent tasks. Each delivers its ready
//!   batch, then its resolved pending batch, and reports errors to the sink's
//!   error channel without affecting the others.
//! - Expiration lookups are bounded per listing. A timeout or failed lookup
//!   degrades the listing to `NO_EXPIRATION`; it never drops the listing.
//!
//! Examples
//! Blocking retrieval:
//! ```rust,ignore
//! use std::sync::Arc;
//! use giveaway::{FinderConfig, Giveaway};
//!
//! let steam = Arc::new(giveaway_steam::SteamAdapter::new_default(cfg.clone().into()));
//! let epic = Arc::new(giveaway_epic::EpicAdapter::new_default(cfg.clone().into()));
//!
//! let finder = Giveaway::new(FinderConfig::default(), vec![steam, epic])?;
//! for listing in finder.retrieve().await? {
//!     println!("{} ({})", listing.title, listing.platform);
//! }
//! ```
//!
//! Incremental delivery:
//! ```rust,ignore
//! let handle = finder.retrieve_with(
//!     |batch| println!("got {} listings", batch.len()),
//!     |err| eprintln!("source error: {err}"),
//! );
//! handle.wait().await;
//! ```
//!
//! See `demos/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod handle;
mod router;
mod sink;

pub use core::{Giveaway, tag_err};
pub use handle::RetrievalHandle;
pub use sink::{FnSink, ListingSink};

// Re-export core types for convenience
pub use giveaway_core::{
    ExpirationResolver, ExpirationTier, FinderConfig, GiveawayError, Listing, ListingContext,
    Locale, MergeOutcome, NO_EXPIRATION, PartialResult, PendingFailurePolicy, PendingListing,
    Platform, Price, SourceAdapter, TierOutcome,
};
