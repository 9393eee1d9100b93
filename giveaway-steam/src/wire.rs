//! Response shapes of the Steam endpoints the adapter talks to.
//!
//! Steam serializes 64-bit integers as strings in some places and as numbers
//! in others, so numeric fields go through [`lenient_i64`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `/search/results/?json=1` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    /// Matching entries, each with a name and a logo URL that embeds the id.
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// One search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Capsule image URL, e.g. `.../steam/apps/<id>/capsule_sm_120.jpg`.
    #[serde(default)]
    pub logo: String,
}

/// Store item id as sent to `IStoreBrowseService/GetItems`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemId {
    /// An app (game or DLC).
    #[serde(rename = "appid")]
    App(u64),
    /// A package ("sub").
    #[serde(rename = "packageid")]
    Package(u64),
    /// A bundle.
    #[serde(rename = "bundleid")]
    Bundle(u64),
}

/// One entry of `response.store_items`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreItem {
    /// 0 = app, 1 = package, 2 = bundle.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub item_type: Option<i64>,
    /// Id of the item in its own namespace.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    /// App id, present for apps.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub appid: Option<i64>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Store path relative to the store root, e.g. `app/440/`.
    #[serde(default)]
    pub store_url_path: Option<String>,
    /// Description and creators.
    #[serde(default)]
    pub basic_info: Option<BasicInfo>,
    /// Asset filenames keyed by role plus `asset_url_format`.
    #[serde(default)]
    pub assets: Option<serde_json::Map<String, Value>>,
    /// Screenshot lists.
    #[serde(default)]
    pub screenshots: Option<Screenshots>,
    /// Cheapest way to buy the item, with its active discounts.
    #[serde(default)]
    pub best_purchase_option: Option<PurchaseOption>,
    /// Parent app for DLC.
    #[serde(default)]
    pub related_items: Option<RelatedItems>,
}

/// `basic_info` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicInfo {
    /// Short description; bundles have none.
    #[serde(default)]
    pub short_description: Option<String>,
    /// Publishers, in store order.
    #[serde(default)]
    pub publishers: Vec<Creator>,
    /// Developers, in store order.
    #[serde(default)]
    pub developers: Vec<Creator>,
}

/// A publisher or developer entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Creator {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Steam group ("clan") account id that posts the creator's events.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub creator_clan_account_id: Option<i64>,
}

/// `screenshots` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Screenshots {
    /// Screenshots safe for every audience.
    #[serde(default)]
    pub all_ages_screenshots: Vec<Screenshot>,
    /// Screenshots flagged as mature content.
    #[serde(default)]
    pub mature_content_screenshots: Vec<Screenshot>,
}

/// One screenshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Screenshot {
    /// Path relative to the CDN root.
    #[serde(default)]
    pub filename: Option<String>,
}

/// `best_purchase_option` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseOption {
    /// Package carrying the discount, when bought as a package.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub packageid: Option<i64>,
    /// Bundle carrying the discount, when bought as a bundle.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub bundleid: Option<i64>,
    /// Discount percentage, 100 for free.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub discount_pct: Option<i64>,
    /// Undiscounted price in cents.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub original_price_in_cents: Option<i64>,
    /// Discounts currently applied.
    #[serde(default)]
    pub active_discounts: Vec<ActiveDiscount>,
}

/// One active discount.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveDiscount {
    /// Amount taken off, in cents.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub discount_amount: Option<i64>,
    /// End of the discount, Unix seconds.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub discount_end_date: Option<i64>,
}

/// `related_items` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedItems {
    /// Base game of a DLC.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub parent_appid: Option<i64>,
}

/// Package data relevant to expiration lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PackageDetails {
    /// Discount end in Unix seconds. Zero when Steam does not expose it.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub discount_end_rtime: Option<i64>,
}

/// One event from `ajaxgetadjacentpartnerevents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClanEventRecord {
    /// Event title.
    #[serde(default)]
    pub event_name: String,
    /// End of the event, Unix seconds; zero or absent when open-ended.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub rtime32_end_time: Option<i64>,
    /// JSON document as a string, or the literal `"null"`.
    #[serde(default)]
    pub jsondata: Option<String>,
}

/// `ajaxgetadjacentpartnerevents` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClanEventsResponse {
    /// Events in the order Steam lists them.
    #[serde(default)]
    pub events: Vec<ClanEventRecord>,
}

/// Parsed `jsondata` of a clan event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventJsonData {
    /// Sale sections listing the covered store items.
    #[serde(default)]
    pub sale_sections: Vec<SaleSection>,
}

/// One section of a sale page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleSection {
    /// Items shown in the section.
    #[serde(default)]
    pub capsules: Vec<Capsule>,
}

/// One item of a sale section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Capsule {
    /// Item id.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    /// `game`, `dlc`, `sub` or `bundle`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Accept an integer given as a JSON number or a decimal string.
pub fn lenient_i64<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept an id given as a JSON string or number.
pub fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}
