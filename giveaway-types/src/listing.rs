//! The normalized listing record handed to callers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Platform;

/// Sentinel epoch meaning "no expiration found".
pub const NO_EXPIRATION: i64 = -1;

/// A temporarily-free game or DLC, normalized across storefronts.
///
/// `expiration_epoch` always holds either a positive Unix timestamp (seconds)
/// or [`NO_EXPIRATION`]. Adapters build listings with the sentinel and the
/// expiration resolver is the only component that overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Display title.
    pub title: String,
    /// Storefront the listing was found on.
    pub platform: Platform,
    /// Whether the listing is downloadable content for another title.
    pub is_dlc: bool,
    /// Short store description, when the source provides one.
    pub description: Option<String>,
    /// Canonical store page.
    pub url: String,
    /// Formatted original (pre-discount) price.
    pub original_price: Option<String>,
    /// Named store artwork keyed by role (header, capsule, ...).
    pub store_media: BTreeMap<String, String>,
    /// Ordered screenshot and trailer URLs.
    pub media: Vec<String>,
    /// Discount end as Unix seconds, or [`NO_EXPIRATION`].
    pub expiration_epoch: i64,
}

impl Listing {
    /// Sentinel epoch meaning "no expiration found".
    pub const NO_EXPIRATION: i64 = NO_EXPIRATION;

    /// Create a listing with empty content fields and no expiration.
    pub fn new(title: impl Into<String>, platform: Platform, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            platform,
            is_dlc: false,
            description: None,
            url: url.into(),
            original_price: None,
            store_media: BTreeMap::new(),
            media: Vec::new(),
            expiration_epoch: NO_EXPIRATION,
        }
    }

    /// True when a real discount end time is known.
    #[must_use]
    pub const fn has_expiration(&self) -> bool {
        self.expiration_epoch > 0
    }

    /// The discount end as a UTC timestamp, if known.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.has_expiration() {
            DateTime::from_timestamp(self.expiration_epoch, 0)
        } else {
            None
        }
    }

    /// Fold any non-positive epoch into the sentinel.
    #[must_use]
    pub fn normalize_expiration(mut self) -> Self {
        self.expiration_epoch = normalize_epoch(self.expiration_epoch);
        self
    }
}

/// Map an arbitrary epoch onto the listing's value domain.
///
/// Positive values are kept; zero and negatives become [`NO_EXPIRATION`].
#[must_use]
pub const fn normalize_epoch(epoch: i64) -> i64 {
    if epoch > 0 { epoch } else { NO_EXPIRATION }
}
