//! giveaway-core
//!
//! Core traits and engine pieces shared across the giveaway ecosystem.
//!
//! - `adapter`: the `SourceAdapter` trait implemented once per storefront.
//! - `partial`: `PartialResult`, the ready-or-pending unit adapters return.
//! - `batch`: splitting a batch into ready/pending and joining the pending set.
//! - `resolve`: the tiered expiration resolver and its building blocks.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Pending listings are driven as Tokio tasks when a batch is merged, and the
//! resolver bounds network tiers with `tokio::time::timeout`. Code that merges
//! batches or resolves expirations must run under a Tokio 1.x runtime.
//!
#![warn(missing_docs)]

/// The `SourceAdapter` trait implemented by storefront connectors.
pub mod adapter;
/// Splitting batches and joining pending listings.
pub mod batch;
/// Ready-or-pending results produced by adapters.
pub mod partial;
/// Tiered expiration resolution.
pub mod resolve;
/// Task handles that abort their task when dropped.
pub mod task;

pub use adapter::SourceAdapter;
pub use batch::{MergeOutcome, merge_when_complete, split};
pub use giveaway_types::*;
pub use partial::{PartialResult, PendingListing, Resolved};
pub use resolve::events::{PromotionalEvent, find_active_event};
pub use resolve::inline::InlineDiscountTier;
pub use resolve::phrase::{PhraseMatch, parse_free_until};
pub use resolve::tier::{ExpirationTier, InlineDiscount, ListingContext, TierOutcome};
pub use resolve::{ExpirationResolver, Resolution};
