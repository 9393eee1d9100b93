//! Response shapes of the GOG catalog and home-page section services, plus
//! the product card embedded in every game page.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `v1/catalog` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    /// Products on the requested page.
    #[serde(default)]
    pub products: Vec<Product>,
}

/// A product as listed by the catalog or a giveaway section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id; the catalog sends a string, sections send a number.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Page slug, e.g. `the_witcher`.
    #[serde(default)]
    pub slug: String,
    /// `game`, `pack`, `dlc` or `extras`.
    #[serde(default)]
    pub product_type: String,
    /// Wide cover image.
    #[serde(default)]
    pub cover_horizontal: Option<String>,
    /// Tall cover image.
    #[serde(default)]
    pub cover_vertical: Option<String>,
    /// Screenshot URL templates containing `_{formatter}`.
    #[serde(default)]
    pub screenshots: Vec<String>,
    /// Catalog price block; sections omit it.
    #[serde(default)]
    pub price: Option<CatalogPrice>,
}

/// `price` block of a catalog product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPrice {
    /// Current price as a plain amount.
    #[serde(default)]
    pub final_money: Option<Money>,
}

/// Amount/currency pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Money {
    /// Decimal amount, e.g. `"0.00"`.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,
}

/// `v1/pages/2f` response: the home page layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionsResponse {
    /// Sections in page order.
    #[serde(default)]
    pub sections: Vec<SectionRef>,
}

/// One home page section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRef {
    /// Id used to fetch the section body.
    #[serde(default, deserialize_with = "lenient_id")]
    pub section_id: String,
    /// e.g. `GIVEAWAY_SECTION`.
    #[serde(default)]
    pub section_type: String,
}

impl SectionRef {
    /// Whether the section advertises a giveaway.
    #[must_use]
    pub fn is_giveaway(&self) -> bool {
        self.section_type.eq_ignore_ascii_case("GIVEAWAY_SECTION")
    }
}

/// `v1/pages/2f/sections/<id>` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionResponse {
    /// Section body; absent for sections that failed to render.
    #[serde(default)]
    pub properties: Option<SectionProperties>,
}

/// Body of a giveaway section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionProperties {
    /// The product being given away.
    #[serde(default)]
    pub product: Option<Product>,
}

/// `cardProduct` object assigned in the game page's inline script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProduct {
    /// HTML description.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<CardPrice>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub box_art_image: Option<String>,
    #[serde(default)]
    pub galaxy_background_image: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// `cardProduct.price`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPrice {
    /// Undiscounted price in major units. Zero for unsupported locales.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub base_amount: Option<Decimal>,
}

/// `window.productcardData.cardProductPromoEndDate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromoEnd {
    /// Wall clock time, `yyyy-MM-dd HH:mm:ss.SSSSSS`.
    #[serde(default)]
    pub date: Option<String>,
    /// Zone id, abbreviation or UTC offset.
    #[serde(default)]
    pub timezone: Option<String>,
}

fn lenient_id<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_decimal<'de, D>(de: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_accept_strings_and_numbers() {
        let a: Product = serde_json::from_value(json!({"id": "1207658924"})).unwrap();
        let b: Product = serde_json::from_value(json!({"id": 1_207_658_924})).unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn amounts_accept_strings_and_numbers() {
        let m: Money = serde_json::from_value(json!({"amount": "0.00"})).unwrap();
        assert_eq!(m.amount, Some(Decimal::ZERO));
        let p: CardPrice = serde_json::from_value(json!({"baseAmount": 9.99})).unwrap();
        assert_eq!(p.base_amount, Decimal::from_str("9.99").ok());
        let junk: CardPrice = serde_json::from_value(json!({"baseAmount": "n/a"})).unwrap();
        assert_eq!(junk.base_amount, None);
    }

    #[test]
    fn only_giveaway_sections_qualify() {
        let body: SectionsResponse = serde_json::from_value(json!({"sections": [
            {"sectionId": "1", "sectionType": "CAROUSEL"},
            {"sectionId": 2, "sectionType": "GIVEAWAY_SECTION"}
        ]}))
        .unwrap();
        let ids: Vec<_> = body
            .sections
            .iter()
            .filter(|s| s.is_giveaway())
            .map(|s| s.section_id.as_str())
            .collect();
        assert_eq!(ids, ["2"]);
    }
}
