#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use giveaway_core::{GiveawayError, Locale};

use crate::mapping::product_types;
use crate::wire::{CatalogResponse, Product, SectionResponse, SectionsResponse};

/// Asks game pages to skip the mature-content interstitial.
pub const MATURE_CONTENT_COOKIE: &str = "gog_wantsmaturecontent=9999";

const CATALOG_PAGE_SIZE: &str = "48";
// Hex-encoded "/" addresses the home page in the sections service.
const HOME_PAGE: &str = "2f";

/// GOG HTTP surface used by the adapter (so we can inject mocks in tests).
///
/// Implementations report transport and decoding problems as plain
/// [`GiveawayError`]s; the adapter attaches retrieval or scrape context.
#[async_trait]
pub trait GogApi: Send + Sync {
    /// Discounted catalog products that are free right now.
    async fn catalog(&self, locale: &Locale, include_dlcs: bool)
    -> Result<Vec<Product>, GiveawayError>;

    /// Products featured in the home page's giveaway sections.
    async fn giveaway_products(&self, locale: &Locale) -> Result<Vec<Product>, GiveawayError>;

    /// Fetch a game page as HTML.
    async fn product_page(&self, url: &str, locale: &Locale) -> Result<String, GiveawayError>;
}

/// Base URLs of the GOG services. Trailing slashes are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GogUrls {
    /// Catalog search service.
    pub catalog: String,
    /// Home page sections service.
    pub sections: String,
    /// Public storefront used for listing links and page scrapes.
    pub store: String,
}

impl Default for GogUrls {
    fn default() -> Self {
        Self {
            catalog: "https://catalog.gog.com/".into(),
            sections: "https://sections.gog.com/".into(),
            store: "https://www.gog.com/".into(),
        }
    }
}

impl GogUrls {
    /// Point every service at the same base, e.g. an `httpmock` server.
    #[must_use]
    pub fn local(base: &str) -> Self {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        Self {
            catalog: base.clone(),
            sections: base.clone(),
            store: base,
        }
    }
}

fn locale_query(locale: &Locale) -> [(&'static str, String); 3] {
    [
        ("countryCode", locale.country.clone()),
        ("locale", locale.tag()),
        ("currencyCode", locale.currency.clone()),
    ]
}

/// Store locale cookie, e.g. `gog_lc=US_USD_en-US`.
#[must_use]
pub fn locale_cookie(locale: &Locale) -> String {
    format!("gog_lc={}_{}_en-US", locale.country, locale.currency)
}

/// Real API backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct RealGogApi {
    http: reqwest::Client,
    urls: GogUrls,
}

impl RealGogApi {
    /// Build a client for the services under `urls`.
    ///
    /// # Errors
    /// Returns `Other` if the HTTP client cannot be constructed.
    pub fn new(urls: GogUrls) -> Result<Self, GiveawayError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GiveawayError::Other(format!("http client: {e}")))?;
        Ok(Self { http, urls })
    }

    /// Configured base URLs.
    #[must_use]
    pub const fn urls(&self) -> &GogUrls {
        &self.urls
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, GiveawayError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| GiveawayError::Other(format!("{url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GiveawayError::Other(format!("{url}: HTTP {status}")));
        }
        resp.json::<T>()
            .await
            .map_err(|e| GiveawayError::Data(format!("{url}: {e}")))
    }
}

#[async_trait]
impl GogApi for RealGogApi {
    async fn catalog(
        &self,
        locale: &Locale,
        include_dlcs: bool,
    ) -> Result<Vec<Product>, GiveawayError> {
        let url = format!("{}v1/catalog", self.urls.catalog);
        let mut query = locale_query(locale).to_vec();
        query.extend([
            ("limit", CATALOG_PAGE_SIZE.to_string()),
            ("order", "desc:trending".to_string()),
            ("discounted", "eq:true".to_string()),
            ("price", "between:0,0".to_string()),
            ("productType", format!("in:{}", product_types(include_dlcs))),
            ("page", "1".to_string()),
        ]);
        let body: CatalogResponse = self.get_json(&url, &query).await?;
        Ok(body.products)
    }

    async fn giveaway_products(&self, locale: &Locale) -> Result<Vec<Product>, GiveawayError> {
        let query = locale_query(locale);
        let home = format!("{}v1/pages/{HOME_PAGE}", self.urls.sections);
        let layout: SectionsResponse = self.get_json(&home, &query).await?;

        let mut products = Vec::new();
        for section in layout.sections.iter().filter(|s| s.is_giveaway()) {
            let url = format!("{home}/sections/{}", section.section_id);
            let body: SectionResponse = self.get_json(&url, &query).await?;
            if let Some(product) = body.properties.and_then(|p| p.product) {
                products.push(product);
            }
        }
        Ok(products)
    }

    async fn product_page(&self, url: &str, locale: &Locale) -> Result<String, GiveawayError> {
        let cookies = format!("{MATURE_CONTENT_COOKIE}; {}", locale_cookie(locale));
        let resp = self
            .http
            .get(url)
            .header(reqwest::header::COOKIE, cookies)
            .send()
            .await
            .map_err(|e| GiveawayError::Other(format!("{url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GiveawayError::Other(format!("{url}: HTTP {status}")));
        }
        resp.text()
            .await
            .map_err(|e| GiveawayError::Data(format!("{url}: {e}")))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn GogApi {
    /// Build a `GogApi` from closures (tests only).
    pub fn from_fns<FC, FG, FP>(fcatalog: FC, fgiveaways: FG, fpage: FP) -> Arc<dyn GogApi>
    where
        FC: Send + Sync + 'static + Fn(bool) -> Result<Vec<Product>, GiveawayError>,
        FG: Send + Sync + 'static + Fn() -> Result<Vec<Product>, GiveawayError>,
        FP: Send + Sync + 'static + Fn(String) -> Result<String, GiveawayError>,
    {
        struct FnGog<FC, FG, FP> {
            fcatalog: FC,
            fgiveaways: FG,
            fpage: FP,
        }

        #[async_trait]
        impl<FC, FG, FP> GogApi for FnGog<FC, FG, FP>
        where
            FC: Send + Sync + 'static + Fn(bool) -> Result<Vec<Product>, GiveawayError>,
            FG: Send + Sync + 'static + Fn() -> Result<Vec<Product>, GiveawayError>,
            FP: Send + Sync + 'static + Fn(String) -> Result<String, GiveawayError>,
        {
            async fn catalog(
                &self,
                _locale: &Locale,
                include_dlcs: bool,
            ) -> Result<Vec<Product>, GiveawayError> {
                (self.fcatalog)(include_dlcs)
            }
            async fn giveaway_products(
                &self,
                _locale: &Locale,
            ) -> Result<Vec<Product>, GiveawayError> {
                (self.fgiveaways)()
            }
            async fn product_page(
                &self,
                url: &str,
                _locale: &Locale,
            ) -> Result<String, GiveawayError> {
                (self.fpage)(url.to_string())
            }
        }

        Arc::new(FnGog {
            fcatalog,
            fgiveaways,
            fpage,
        })
    }
}
