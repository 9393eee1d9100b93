//! giveaway-epic
//!
//! Epic Games Store connector for the giveaway orchestrator.
//!
//! The public `freeGamesPromotions` feed already carries each promotion's end
//! date, so every listing comes back as [`PartialResult::Ready`] and no
//! resolution tiers are involved. Only titles that are free now and normally
//! cost money are reported; duplicates are collapsed by title.
//!
//! Enable the `test-adapters` feature for the closure-backed
//! `EpicApi::from_fn`.
#![warn(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use giveaway_core::{FinderConfig, GiveawayError, PartialResult, Platform, SourceAdapter};

/// Injectable promotions feed and its reqwest implementation.
pub mod adapter;
/// Element to listing conversion.
pub mod mapping;
pub mod wire;

pub use adapter::{EpicApi, EpicUrls, RealEpicApi};

/// Epic Games Store source adapter.
pub struct EpicAdapter {
    api: Arc<dyn EpicApi>,
    cfg: Arc<FinderConfig>,
    store: String,
}

impl EpicAdapter {
    /// Stable adapter name.
    pub const NAME: &'static str = "giveaway-epic";

    /// Adapter reading the public promotions feed.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new_default(cfg: Arc<FinderConfig>) -> Result<Self, GiveawayError> {
        Self::with_urls(cfg, EpicUrls::default())
    }

    /// Adapter reading the feed under `urls.backend`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_urls(cfg: Arc<FinderConfig>, urls: EpicUrls) -> Result<Self, GiveawayError> {
        let api: Arc<dyn EpicApi> = Arc::new(RealEpicApi::new(urls.backend)?);
        Ok(Self::with_api(cfg, api, urls.store))
    }

    /// Adapter over a caller-supplied API; `store` is the base of listing links.
    #[must_use]
    pub fn with_api(cfg: Arc<FinderConfig>, api: Arc<dyn EpicApi>, store: impl Into<String>) -> Self {
        Self {
            api,
            cfg,
            store: store.into(),
        }
    }
}

impl core::fmt::Debug for EpicAdapter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EpicAdapter")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SourceAdapter for EpicAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::EpicGames
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "giveaway_epic::fetch", skip(self))
    )]
    async fn fetch(&self) -> Result<Vec<PartialResult>, GiveawayError> {
        let elements = self
            .api
            .free_promotions(&self.cfg.locale)
            .await
            .map_err(|e| {
                GiveawayError::source_retrieval(Platform::EpicGames.as_str(), e.to_string())
            })?;
        let listings = mapping::map_elements(&elements, &self.cfg, &self.store, Utc::now());

        #[cfg(feature = "tracing")]
        tracing::debug!(elements = elements.len(), listings = listings.len(), "epic promotions mapped");

        Ok(listings.into_iter().map(PartialResult::Ready).collect())
    }
}
