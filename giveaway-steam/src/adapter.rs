#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use giveaway_core::{GiveawayError, Locale};

use crate::wire::{
    ClanEventRecord, ClanEventsResponse, ItemId, PackageDetails, SearchResults, StoreItem,
};

/// Cookies that get past the store's age gate.
pub const AGE_GATE_COOKIES: &str = "birthtime=568022401; lastagecheckage=1-January-1988";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Steam HTTP surface used by the adapter and its tiers (so we can inject mocks in tests).
///
/// Implementations report transport and decoding problems as plain
/// [`GiveawayError`]s; callers attach the context (retrieval, lookup, scrape).
#[async_trait]
pub trait SteamApi: Send + Sync {
    /// Search the store for discounted items whose price is now free.
    async fn search_free(&self) -> Result<SearchResults, GiveawayError>;

    /// Fetch store metadata for `ids` in the given locale.
    async fn store_items(
        &self,
        ids: &[ItemId],
        locale: &Locale,
    ) -> Result<Vec<StoreItem>, GiveawayError>;

    /// Fetch package details. `None` when Steam does not know the package.
    async fn package_details(
        &self,
        package_id: &str,
    ) -> Result<Option<PackageDetails>, GiveawayError>;

    /// Fetch upcoming events posted by a Steam group.
    async fn clan_events(&self, clan_id: &str) -> Result<Vec<ClanEventRecord>, GiveawayError>;

    /// Fetch a store page as HTML, past the age gate.
    async fn store_page(&self, url: &str) -> Result<String, GiveawayError>;
}

/// Base URLs of the Steam services. Trailing slashes are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamUrls {
    /// Storefront, e.g. `https://store.steampowered.com/`.
    pub store: String,
    /// Web API, e.g. `https://api.steampowered.com/`.
    pub api: String,
    /// Image CDN.
    pub cdn: String,
}

impl Default for SteamUrls {
    fn default() -> Self {
        Self {
            store: "https://store.steampowered.com/".into(),
            api: "https://api.steampowered.com/".into(),
            cdn: "https://cdn.cloudflare.steamstatic.com/".into(),
        }
    }
}

impl SteamUrls {
    /// Point store and API at the same base, e.g. an `httpmock` server.
    #[must_use]
    pub fn local(base: &str) -> Self {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        Self {
            store: base.clone(),
            api: base.clone(),
            cdn: format!("{base}cdn/"),
        }
    }
}

#[derive(Serialize)]
struct GetItemsInput<'a> {
    ids: &'a [ItemId],
    context: Context<'a>,
    data_request: DataRequest,
}

#[derive(Serialize)]
struct Context<'a> {
    language: &'a str,
    country_code: &'a str,
    steam_realm: u8,
}

#[derive(Serialize)]
struct DataRequest {
    include_basic_info: bool,
    include_assets: bool,
    include_screenshots: bool,
}

/// Real API backed by a single `reqwest::Client`.
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Debug, Clone)]
pub struct RealSteamApi {
    http: reqwest::Client,
    urls: SteamUrls,
}

impl RealSteamApi {
    /// Build a client with a cookie store and a browser user agent.
    ///
    /// # Errors
    /// Returns `Other` if the HTTP client cannot be constructed.
    pub fn new(urls: SteamUrls) -> Result<Self, GiveawayError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GiveawayError::Other(format!("http client: {e}")))?;
        Ok(Self { http, urls })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn with_client(http: reqwest::Client, urls: SteamUrls) -> Self {
        Self { http, urls }
    }

    /// Configured base URLs.
    #[must_use]
    pub const fn urls(&self) -> &SteamUrls {
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
            .map_err(|e| map_http_err(&e, url))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GiveawayError::Other(format!("{url}: HTTP {status}")));
        }
        resp.json::<T>()
            .await
            .map_err(|e| GiveawayError::Data(format!("{url}: {e}")))
    }
}

fn map_http_err(e: &reqwest::Error, url: &str) -> GiveawayError {
    if e.is_timeout() {
        GiveawayError::Other(format!("{url}: request timed out"))
    } else {
        GiveawayError::Other(format!("{url}: {e}"))
    }
}

#[async_trait]
impl SteamApi for RealSteamApi {
    async fn search_free(&self) -> Result<SearchResults, GiveawayError> {
        let url = format!("{}search/results/", self.urls.store);
        let query = [
            ("ignore_preferences", "1".to_string()),
            ("maxprice", "free".to_string()),
            ("specials", "1".to_string()),
            ("json", "1".to_string()),
        ];
        self.get_json(&url, &query).await
    }

    async fn store_items(
        &self,
        ids: &[ItemId],
        locale: &Locale,
    ) -> Result<Vec<StoreItem>, GiveawayError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let input = GetItemsInput {
            ids,
            context: Context {
                language: locale.language_name(),
                country_code: &locale.country,
                steam_realm: 1,
            },
            data_request: DataRequest {
                include_basic_info: true,
                include_assets: true,
                include_screenshots: true,
            },
        };
        let input_json = serde_json::to_string(&input)
            .map_err(|e| GiveawayError::Data(format!("GetItems input: {e}")))?;
        let url = format!("{}IStoreBrowseService/GetItems/v1", self.urls.api);
        let body: Value = self.get_json(&url, &[("input_json", input_json)]).await?;
        let items = body
            .get("response")
            .and_then(|r| r.get("store_items"))
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        serde_json::from_value(items).map_err(|e| GiveawayError::Data(format!("store_items: {e}")))
    }

    async fn package_details(
        &self,
        package_id: &str,
    ) -> Result<Option<PackageDetails>, GiveawayError> {
        let url = format!("{}api/packagedetails", self.urls.store);
        let body: Value = self
            .get_json(&url, &[("packageids", package_id.to_string())])
            .await?;
        parse_package_details(&body, package_id)
    }

    async fn clan_events(&self, clan_id: &str) -> Result<Vec<ClanEventRecord>, GiveawayError> {
        let url = format!("{}events/ajaxgetadjacentpartnerevents/", self.urls.store);
        let query = [
            ("clan_accountid", clan_id.to_string()),
            ("count_before", "0".to_string()),
            ("count_after", "100".to_string()),
        ];
        let resp: ClanEventsResponse = self.get_json(&url, &query).await?;
        Ok(resp.events)
    }

    async fn store_page(&self, url: &str) -> Result<String, GiveawayError> {
        let resp = self
            .http
            .get(url)
            .header(reqwest::header::COOKIE, AGE_GATE_COOKIES)
            .send()
            .await
            .map_err(|e| map_http_err(&e, url))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GiveawayError::Other(format!("{url}: HTTP {status}")));
        }
        resp.text()
            .await
            .map_err(|e| GiveawayError::Data(format!("{url}: {e}")))
    }
}

/// Pick the package node out of a `packagedetails` body.
///
/// The body is keyed by package id. Entries reporting `success: false` are
/// treated as unknown packages. The interesting fields may sit at the entry
/// itself or under its `data` object.
pub(crate) fn parse_package_details(
    body: &Value,
    package_id: &str,
) -> Result<Option<PackageDetails>, GiveawayError> {
    let Some(map) = body.as_object() else {
        return Ok(None);
    };
    let Some(entry) = map.get(package_id) else {
        return Ok(None);
    };
    if entry.get("success").and_then(Value::as_bool) == Some(false) {
        return Ok(None);
    }
    let node = entry.get("data").unwrap_or(entry);
    serde_json::from_value(node.clone())
        .map(Some)
        .map_err(|e| GiveawayError::Data(format!("packagedetails {package_id}: {e}")))
}

#[cfg(feature = "test-adapters")]
impl dyn SteamApi {
    /// Build a `SteamApi` from closures (tests only).
    pub fn from_fns<FS, FI, FP, FE, FW>(
        fsearch: FS,
        fitems: FI,
        fpackage: FP,
        fevents: FE,
        fpage: FW,
    ) -> Arc<dyn SteamApi>
    where
        FS: Send + Sync + 'static + Fn() -> Result<SearchResults, GiveawayError>,
        FI: Send + Sync + 'static + Fn(Vec<ItemId>) -> Result<Vec<StoreItem>, GiveawayError>,
        FP: Send + Sync + 'static + Fn(String) -> Result<Option<PackageDetails>, GiveawayError>,
        FE: Send + Sync + 'static + Fn(String) -> Result<Vec<ClanEventRecord>, GiveawayError>,
        FW: Send + Sync + 'static + Fn(String) -> Result<String, GiveawayError>,
    {
        struct FnSteam<FS, FI, FP, FE, FW> {
            fsearch: FS,
            fitems: FI,
            fpackage: FP,
            fevents: FE,
            fpage: FW,
        }

        #[async_trait]
        impl<FS, FI, FP, FE, FW> SteamApi for FnSteam<FS, FI, FP, FE, FW>
        where
            FS: Send + Sync + 'static + Fn() -> Result<SearchResults, GiveawayError>,
            FI: Send + Sync + 'static + Fn(Vec<ItemId>) -> Result<Vec<StoreItem>, GiveawayError>,
            FP: Send
                + Sync
                + 'static
                + Fn(String) -> Result<Option<PackageDetails>, GiveawayError>,
            FE: Send + Sync + 'static + Fn(String) -> Result<Vec<ClanEventRecord>, GiveawayError>,
            FW: Send + Sync + 'static + Fn(String) -> Result<String, GiveawayError>,
        {
            async fn search_free(&self) -> Result<SearchResults, GiveawayError> {
                (self.fsearch)()
            }
            async fn store_items(
                &self,
                ids: &[ItemId],
                _locale: &Locale,
            ) -> Result<Vec<StoreItem>, GiveawayError> {
                (self.fitems)(ids.to_vec())
            }
            async fn package_details(
                &self,
                package_id: &str,
            ) -> Result<Option<PackageDetails>, GiveawayError> {
                (self.fpackage)(package_id.to_string())
            }
            async fn clan_events(
                &self,
                clan_id: &str,
            ) -> Result<Vec<ClanEventRecord>, GiveawayError> {
                (self.fevents)(clan_id.to_string())
            }
            async fn store_page(&self, url: &str) -> Result<String, GiveawayError> {
                (self.fpage)(url.to_string())
            }
        }

        Arc::new(FnSteam {
            fsearch,
            fitems,
            fpackage,
            fevents,
            fpage,
        })
    }
}
