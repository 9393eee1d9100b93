//! Response shape of `freeGamesPromotions`.
//!
//! Epic returns `null` for many optional blocks, so everything below is
//! optional or defaulted.

use serde::{Deserialize, Deserializer};

/// Top-level response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromotionsResponse {
    /// GraphQL-style data envelope.
    #[serde(default)]
    pub data: Option<Data>,
}

impl PromotionsResponse {
    /// Elements of the store search, empty when any envelope level is missing.
    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        self.data
            .and_then(|d| d.catalog)
            .and_then(|c| c.search_store)
            .map(|s| s.elements)
            .unwrap_or_default()
    }
}

/// `data` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    /// Catalog query result.
    #[serde(default, rename = "Catalog")]
    pub catalog: Option<Catalog>,
}

/// `Catalog` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    /// Search result.
    #[serde(default, rename = "searchStore")]
    pub search_store: Option<SearchStore>,
}

/// `searchStore` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchStore {
    /// Offers, in store order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub elements: Vec<Element>,
}

/// One store offer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Store description.
    #[serde(default)]
    pub description: Option<String>,
    /// `BASE_GAME`, `DLC`, `ADD_ON`, `BUNDLE`, ...
    #[serde(default)]
    pub offer_type: Option<String>,
    /// Product page slug.
    #[serde(default)]
    pub product_slug: Option<String>,
    /// Offer page slug.
    #[serde(default)]
    pub url_slug: Option<String>,
    /// Namespace with page mappings.
    #[serde(default)]
    pub catalog_ns: Option<CatalogNs>,
    /// Artwork by role.
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_images: Vec<KeyImage>,
    /// Current price.
    #[serde(default)]
    pub price: Option<PriceBlock>,
    /// Current and upcoming promotions.
    #[serde(default)]
    pub promotions: Option<Promotions>,
}

/// `catalogNs` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogNs {
    /// Store pages for the namespace.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mappings: Vec<PageMapping>,
}

/// One page mapping.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMapping {
    /// Page slug.
    #[serde(default)]
    pub page_slug: Option<String>,
    /// Page type, usually `productHome`.
    #[serde(default)]
    pub page_type: Option<String>,
}

/// One artwork entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyImage {
    /// Role, e.g. `OfferImageWide` or `featuredMedia`.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Image URL.
    #[serde(default)]
    pub url: String,
}

/// `price` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBlock {
    /// Totals in minor units.
    #[serde(default)]
    pub total_price: Option<TotalPrice>,
}

/// `price.totalPrice` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalPrice {
    /// Price after discounts, minor units.
    #[serde(default)]
    pub discount_price: Option<i64>,
    /// Price before discounts, minor units.
    #[serde(default)]
    pub original_price: Option<i64>,
    /// ISO currency code.
    #[serde(default)]
    pub currency_code: Option<String>,
    /// Decimal places of the currency.
    #[serde(default)]
    pub currency_info: Option<CurrencyInfo>,
}

/// `currencyInfo` block.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CurrencyInfo {
    /// Decimal places.
    #[serde(default)]
    pub decimals: Option<u32>,
}

/// `promotions` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotions {
    /// Running promotions, grouped.
    #[serde(default, deserialize_with = "null_as_default")]
    pub promotional_offers: Vec<OfferGroup>,
    /// Promotions that have not started yet.
    #[serde(default, deserialize_with = "null_as_default")]
    pub upcoming_promotional_offers: Vec<OfferGroup>,
}

/// A group of offers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferGroup {
    /// Offers of the group.
    #[serde(default, deserialize_with = "null_as_default")]
    pub promotional_offers: Vec<Offer>,
}

/// One promotional offer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// RFC 3339 start.
    #[serde(default)]
    pub start_date: Option<String>,
    /// RFC 3339 end.
    #[serde(default)]
    pub end_date: Option<String>,
    /// How the discount applies.
    #[serde(default)]
    pub discount_setting: Option<DiscountSetting>,
}

/// `discountSetting` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSetting {
    /// Usually `PERCENTAGE`.
    #[serde(default)]
    pub discount_type: Option<String>,
    /// Percentage of the price still paid; 0 means free.
    #[serde(default)]
    pub discount_percentage: Option<i64>,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
