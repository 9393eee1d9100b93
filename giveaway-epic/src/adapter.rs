#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;

use giveaway_core::{GiveawayError, Locale};

use crate::wire::{Element, PromotionsResponse};

/// Promotions feed abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait EpicApi: Send + Sync {
    /// Fetch the free-games promotions for `locale`.
    async fn free_promotions(&self, locale: &Locale) -> Result<Vec<Element>, GiveawayError>;
}

/// Base URLs of the Epic services. Trailing slashes are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicUrls {
    /// Static store backend serving `freeGamesPromotions`.
    pub backend: String,
    /// Public storefront used for listing links.
    pub store: String,
}

impl Default for EpicUrls {
    fn default() -> Self {
        Self {
            backend: "https://store-site-backend-static.ak.epicgames.com/".into(),
            store: "https://store.epicgames.com/".into(),
        }
    }
}

/// Real API backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct RealEpicApi {
    http: reqwest::Client,
    backend: String,
}

impl RealEpicApi {
    /// Build a client for the promotions feed under `backend`.
    ///
    /// # Errors
    /// Returns `Other` if the HTTP client cannot be constructed.
    pub fn new(backend: impl Into<String>) -> Result<Self, GiveawayError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GiveawayError::Other(format!("http client: {e}")))?;
        Ok(Self {
            http,
            backend: backend.into(),
        })
    }
}

#[async_trait]
impl EpicApi for RealEpicApi {
    async fn free_promotions(&self, locale: &Locale) -> Result<Vec<Element>, GiveawayError> {
        let url = format!("{}freeGamesPromotions", self.backend);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("locale", locale.tag()),
                ("country", locale.country.clone()),
                ("allowCountries", locale.country.clone()),
            ])
            .send()
            .await
            .map_err(|e| GiveawayError::Other(format!("{url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GiveawayError::Other(format!("{url}: HTTP {status}")));
        }
        let body: PromotionsResponse = resp
            .json()
            .await
            .map_err(|e| GiveawayError::Data(format!("{url}: {e}")))?;
        Ok(body.into_elements())
    }
}

#[cfg(feature = "test-adapters")]
impl dyn EpicApi {
    /// Build an `EpicApi` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn EpicApi>
    where
        F: Send + Sync + 'static + Fn(Locale) -> Result<Vec<Element>, GiveawayError>,
    {
        struct FnEpic<F>(F);

        #[async_trait]
        impl<F> EpicApi for FnEpic<F>
        where
            F: Send + Sync + 'static + Fn(Locale) -> Result<Vec<Element>, GiveawayError>,
        {
            async fn free_promotions(
                &self,
                locale: &Locale,
            ) -> Result<Vec<Element>, GiveawayError> {
                (self.0)(locale.clone())
            }
        }

        Arc::new(FnEpic(f))
    }
}
