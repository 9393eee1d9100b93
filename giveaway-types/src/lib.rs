//! Giveaway data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod listing;
mod platform;
mod price;

pub use config::{FinderConfig, Locale, PendingFailurePolicy};
pub use error::GiveawayError;
pub use listing::{Listing, NO_EXPIRATION, normalize_epoch};
pub use platform::Platform;
pub use price::Price;
