//! giveaway-steam
//!
//! Steam store connector for the giveaway orchestrator.
//!
//! Overview
//! - Finds 100%-discounted store items through the search endpoint, then
//!   loads their metadata in one `IStoreBrowseService/GetItems` call.
//! - Works out when each giveaway ends with a four-tier chain: the discount
//!   embedded in the item data, the package details endpoint, the
//!   publisher's event calendar, and finally the store page text.
//! - Listings whose end is known up front come back ready; the rest come
//!   back pending and finish their lookups under the configured
//!   resolution timeout.
//!
//! Dependency injection for tests
//! - All HTTP goes through the [`SteamApi`] trait. [`RealSteamApi`] talks to
//!   Steam (or to any base URL, e.g. an `httpmock` server); enable the
//!   `test-adapters` feature for closure-backed `SteamApi::from_fns`.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use giveaway_core::FinderConfig;
//! use giveaway_steam::SteamAdapter;
//!
//! let cfg = Arc::new(FinderConfig::default());
//! let steam = SteamAdapter::new_default(cfg)?;
//! ```
#![warn(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;

use giveaway_core::{
    ExpirationResolver, ExpirationTier, FinderConfig, GiveawayError, InlineDiscountTier,
    PartialResult, Platform, SourceAdapter,
};

/// Injectable Steam HTTP surface and its reqwest implementation.
pub mod adapter;
/// Store item to listing conversion.
pub mod mapping;
pub mod tiers;
/// Wire types of the Steam endpoints.
pub mod wire;

pub use adapter::{AGE_GATE_COOKIES, RealSteamApi, SteamApi, SteamUrls};
pub use tiers::{ClanEventTier, PackageLookupTier, StorePageTier};

/// Steam source adapter.
pub struct SteamAdapter {
    api: Arc<dyn SteamApi>,
    cfg: Arc<FinderConfig>,
    urls: SteamUrls,
    resolver: Arc<ExpirationResolver>,
}

impl SteamAdapter {
    /// Stable adapter name.
    pub const NAME: &'static str = "giveaway-steam";

    /// Adapter talking to the public Steam endpoints.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new_default(cfg: Arc<FinderConfig>) -> Result<Self, GiveawayError> {
        Self::with_urls(cfg, SteamUrls::default())
    }

    /// Adapter talking to Steam-compatible endpoints under `urls`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_urls(cfg: Arc<FinderConfig>, urls: SteamUrls) -> Result<Self, GiveawayError> {
        let api: Arc<dyn SteamApi> = Arc::new(RealSteamApi::new(urls.clone())?);
        Ok(Self::with_api(cfg, api, urls))
    }

    /// Adapter over a caller-supplied API. `urls` only shapes listing links.
    #[must_use]
    pub fn with_api(cfg: Arc<FinderConfig>, api: Arc<dyn SteamApi>, urls: SteamUrls) -> Self {
        let tiers = Self::tiers(&cfg, &api);
        let resolver = Arc::new(ExpirationResolver::new(tiers, cfg.resolution_timeout));
        Self {
            api,
            cfg,
            urls,
            resolver,
        }
    }

    /// The tier chain for `cfg`: inline, package lookup, clan events (when
    /// the event calendar is enabled) and store page.
    #[must_use]
    pub fn tiers(cfg: &FinderConfig, api: &Arc<dyn SteamApi>) -> Vec<Arc<dyn ExpirationTier>> {
        let mut tiers: Vec<Arc<dyn ExpirationTier>> = vec![
            Arc::new(InlineDiscountTier),
            Arc::new(PackageLookupTier::new(Arc::clone(api))),
        ];
        if cfg.use_event_calendar {
            tiers.push(Arc::new(ClanEventTier::new(Arc::clone(api))));
        }
        tiers.push(Arc::new(StorePageTier::new(Arc::clone(api))));
        tiers
    }

    /// Resolver shared by every listing this adapter produces.
    #[must_use]
    pub const fn resolver(&self) -> &Arc<ExpirationResolver> {
        &self.resolver
    }

    fn retrieval_err(e: &GiveawayError) -> GiveawayError {
        GiveawayError::source_retrieval(Platform::Steam.as_str(), e.to_string())
    }
}

impl core::fmt::Debug for SteamAdapter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SteamAdapter")
            .field("urls", &self.urls)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SourceAdapter for SteamAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::Steam
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "giveaway_steam::fetch", skip(self))
    )]
    async fn fetch(&self) -> Result<Vec<PartialResult>, GiveawayError> {
        let results = self
            .api
            .search_free()
            .await
            .map_err(|e| Self::retrieval_err(&e))?;
        let ids = mapping::extract_ids(&results);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = self
            .api
            .store_items(&ids, &self.cfg.locale)
            .await
            .map_err(|e| Self::retrieval_err(&e))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(search_hits = ids.len(), store_items = items.len(), "steam items loaded");

        let mut out = Vec::with_capacity(items.len());
        for item in &items {
            let Some((listing, ctx)) = mapping::map_item(item, &self.cfg, &self.urls) else {
                continue;
            };
            out.push(self.resolver.prepare(listing, ctx).await);
        }
        Ok(out)
    }
}
