//! giveaway-gog
//!
//! GOG.com connector for the giveaway orchestrator.
//!
//! Overview
//! - Collects the products of the home page's giveaway sections, then the
//!   discounted catalog products that are free right now. A product listed
//!   in both is reported once.
//! - Neither source states when a promotion ends. Every listing therefore
//!   comes back pending and is completed from the product card embedded in
//!   its game page (description, original price, artwork, promotion end),
//!   bounded by the configured resolution timeout.
//! - A page that cannot be fetched or carries no card degrades the listing
//!   to `NO_EXPIRATION` instead of dropping it.
//!
//! Enable the `test-adapters` feature for the closure-backed
//! `GogApi::from_fns`.
#![warn(missing_docs)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use giveaway_core::{
    FinderConfig, GiveawayError, Listing, Locale, PartialResult, PendingListing, Platform,
    Resolved, SourceAdapter,
};

/// Injectable GOG HTTP surface and its reqwest implementation.
pub mod adapter;
pub mod card;
/// Catalog product to listing conversion.
pub mod mapping;
/// Wire types of the GOG services.
pub mod wire;

pub use adapter::{GogApi, GogUrls, MATURE_CONTENT_COOKIE, RealGogApi};

/// GOG source adapter.
pub struct GogAdapter {
    api: Arc<dyn GogApi>,
    cfg: Arc<FinderConfig>,
    store: String,
}

impl GogAdapter {
    /// Stable adapter name.
    pub const NAME: &'static str = "giveaway-gog";

    /// Adapter talking to the public GOG services.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new_default(cfg: Arc<FinderConfig>) -> Result<Self, GiveawayError> {
        Self::with_urls(cfg, GogUrls::default())
    }

    /// Adapter talking to the services under `urls`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_urls(cfg: Arc<FinderConfig>, urls: GogUrls) -> Result<Self, GiveawayError> {
        let store = urls.store.clone();
        let api: Arc<dyn GogApi> = Arc::new(RealGogApi::new(urls)?);
        Ok(Self::with_api(cfg, api, store))
    }

    /// Adapter over a caller-supplied API; `store` is the base of game pages.
    #[must_use]
    pub fn with_api(cfg: Arc<FinderConfig>, api: Arc<dyn GogApi>, store: impl Into<String>) -> Self {
        Self {
            api,
            cfg,
            store: store.into(),
        }
    }

    fn retrieval_err(e: &GiveawayError) -> GiveawayError {
        GiveawayError::source_retrieval(Platform::Gog.as_str(), e.to_string())
    }

    fn pending(&self, listing: Listing) -> PartialResult {
        let api = Arc::clone(&self.api);
        let locale = self.cfg.locale.clone();
        let timeout = self.cfg.resolution_timeout;
        let label = listing.title.clone();
        PartialResult::Pending(PendingListing::resolving(
            label,
            complete_from_page(api, listing, locale, timeout),
        ))
    }
}

impl core::fmt::Debug for GogAdapter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GogAdapter")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

async fn complete_from_page(
    api: Arc<dyn GogApi>,
    mut listing: Listing,
    locale: Locale,
    timeout: Duration,
) -> Resolved {
    let url = listing.url.clone();
    let fetched = tokio::time::timeout(timeout, api.product_page(&url, &locale)).await;
    let failure = match fetched {
        Ok(Ok(page)) => match card::extract_card(&page) {
            Ok(card) => {
                card::apply_card(&mut listing, &card, &locale);
                return Resolved::clean(listing);
            }
            Err(msg) => GiveawayError::scrape(url, msg),
        },
        Ok(Err(e)) => GiveawayError::scrape(url, e.to_string()),
        Err(_) => GiveawayError::resolution_timeout(&listing.title, timeout),
    };

    #[cfg(feature = "tracing")]
    tracing::warn!(listing = %listing.title, error = %failure, "gog product card unavailable");

    Resolved {
        listing,
        degraded: vec![failure],
    }
}

#[async_trait]
impl SourceAdapter for GogAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::Gog
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "giveaway_gog::fetch", skip(self))
    )]
    async fn fetch(&self) -> Result<Vec<PartialResult>, GiveawayError> {
        let locale = &self.cfg.locale;
        let giveaways = self
            .api
            .giveaway_products(locale)
            .await
            .map_err(|e| Self::retrieval_err(&e))?;
        let catalog = self
            .api
            .catalog(locale, self.cfg.include_dlcs)
            .await
            .map_err(|e| Self::retrieval_err(&e))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(giveaways = giveaways.len(), catalog = catalog.len(), "gog products loaded");

        let mut seen = HashSet::new();
        let out = giveaways
            .iter()
            .chain(&catalog)
            .filter(|p| {
                let key = if p.id.is_empty() { &p.slug } else { &p.id };
                seen.insert(key.clone())
            })
            .filter_map(|p| mapping::map_product(p, &self.cfg, &self.store))
            .map(|listing| self.pending(listing))
            .collect();
        Ok(out)
    }
}
