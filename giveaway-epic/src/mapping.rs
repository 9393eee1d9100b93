use std::collections::HashSet;

use chrono::{DateTime, Utc};

use giveaway_core::{FinderConfig, Listing, Locale, NO_EXPIRATION, Platform, Price};

use crate::wire::Element;

const FEATURED_MEDIA: &str = "featuredMedia";

/// Whether an offer type denotes add-on content.
#[must_use]
pub fn is_dlc_offer(offer_type: Option<&str>) -> bool {
    offer_type.is_some_and(|t| t.eq_ignore_ascii_case("DLC") || t.eq_ignore_ascii_case("ADD_ON"))
}

/// Whether the element is free right now and normally costs money.
#[must_use]
pub fn is_giveaway(el: &Element) -> bool {
    let Some(total) = el.price.as_ref().and_then(|p| p.total_price.as_ref()) else {
        return false;
    };
    total.discount_price == Some(0) && total.original_price.is_some_and(|p| p > 0)
}

/// Store page for the element, or the store root when it has no usable slug.
#[must_use]
pub fn listing_url(el: &Element, store: &str, locale: &Locale) -> String {
    let usable = |s: &Option<String>| {
        s.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "[]")
            .map(str::to_string)
    };
    let slug = usable(&el.product_slug)
        .or_else(|| usable(&el.url_slug))
        .or_else(|| {
            el.catalog_ns
                .as_ref()
                .and_then(|ns| ns.mappings.first())
                .and_then(|m| usable(&m.page_slug))
        });
    match slug {
        Some(slug) => format!("{store}{}/p/{slug}", locale.tag()),
        None => store.to_string(),
    }
}

/// End of the running 100%-off promotion, or the sentinel.
///
/// Takes the first offer with `discountPercentage == 0` whose end lies after
/// `now`. Offers with a missing or unparsable end are skipped.
#[must_use]
pub fn offer_end(el: &Element, now: DateTime<Utc>) -> i64 {
    let Some(promotions) = el.promotions.as_ref() else {
        return NO_EXPIRATION;
    };
    promotions
        .promotional_offers
        .iter()
        .flat_map(|g| &g.promotional_offers)
        .filter(|o| {
            o.discount_setting
                .as_ref()
                .and_then(|d| d.discount_percentage)
                == Some(0)
        })
        .filter_map(|o| o.end_date.as_deref())
        .filter_map(|end| DateTime::parse_from_rfc3339(end).ok())
        .map(|end| end.timestamp())
        .find(|end| *end > now.timestamp())
        .unwrap_or(NO_EXPIRATION)
}

/// Convert one element into a ready listing.
///
/// Returns `None` for elements without a title, that are not a giveaway, or
/// that are DLC while DLC is excluded.
#[must_use]
pub fn map_element(
    el: &Element,
    cfg: &FinderConfig,
    store: &str,
    now: DateTime<Utc>,
) -> Option<Listing> {
    let title = el.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    if !is_giveaway(el) {
        return None;
    }
    let dlc = is_dlc_offer(el.offer_type.as_deref());
    if dlc && !cfg.include_dlcs {
        return None;
    }

    let mut listing = Listing::new(title, Platform::EpicGames, listing_url(el, store, &cfg.locale));
    listing.is_dlc = dlc;
    listing.description = el
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty() && *d != title)
        .map(str::to_string);

    if let Some(total) = el.price.as_ref().and_then(|p| p.total_price.as_ref()) {
        let decimals = total.currency_info.and_then(|c| c.decimals).unwrap_or(2);
        let currency = total
            .currency_code
            .clone()
            .unwrap_or_else(|| cfg.locale.currency.clone());
        listing.original_price = total
            .original_price
            .map(|minor| Price::new(minor, decimals, currency).to_string());
    }

    for image in el.key_images.iter().filter(|i| !i.url.is_empty()) {
        if image.kind.eq_ignore_ascii_case(FEATURED_MEDIA) {
            listing.media.push(image.url.clone());
        } else {
            listing
                .store_media
                .entry(image.kind.clone())
                .or_insert_with(|| image.url.clone());
        }
    }

    listing.expiration_epoch = offer_end(el, now);
    Some(listing)
}

/// Map a whole response, keeping the first listing per title.
#[must_use]
pub fn map_elements(
    elements: &[Element],
    cfg: &FinderConfig,
    store: &str,
    now: DateTime<Utc>,
) -> Vec<Listing> {
    let mut seen = HashSet::new();
    elements
        .iter()
        .filter_map(|el| map_element(el, cfg, store, now))
        .filter(|l| seen.insert(l.title.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STORE: &str = "https://store.epicgames.com/";

    fn element(v: serde_json::Value) -> Element {
        serde_json::from_value(v).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn free(title: &str, offer_type: &str) -> serde_json::Value {
        json!({
            "title": title,
            "description": "A game.",
            "offerType": offer_type,
            "productSlug": "cool-game",
            "keyImages": [
                {"type": "OfferImageWide", "url": "https://img/wide.jpg"},
                {"type": "featuredMedia", "url": "https://img/1.jpg"},
                {"type": "featuredMedia", "url": "https://img/2.jpg"}
            ],
            "price": {"totalPrice": {
                "discountPrice": 0, "originalPrice": 2499,
                "currencyCode": "USD", "currencyInfo": {"decimals": 2}
            }},
            "promotions": {"promotionalOffers": [{"promotionalOffers": [
                {"endDate": "2023-01-01T00:00:00.000Z", "discountSetting": {"discountPercentage": 0}},
                {"endDate": "2030-01-01T16:00:00.000Z", "discountSetting": {"discountPercentage": 50}},
                {"endDate": "2030-01-02T16:00:00.000Z", "discountSetting": {"discountPercentage": 0}}
            ]}]}
        })
    }

    #[test]
    fn maps_a_giveaway() {
        let l = map_element(&element(free("Cool Game", "BASE_GAME")), &FinderConfig::default(), STORE, now())
            .unwrap();
        assert_eq!(l.title, "Cool Game");
        assert_eq!(l.platform, Platform::EpicGames);
        assert!(!l.is_dlc);
        assert_eq!(l.url, "https://store.epicgames.com/en-US/p/cool-game");
        assert_eq!(l.original_price.as_deref(), Some("$24.99"));
        assert_eq!(l.media, vec!["https://img/1.jpg", "https://img/2.jpg"]);
        assert_eq!(
            l.store_media.get("OfferImageWide").map(String::as_str),
            Some("https://img/wide.jpg")
        );
        assert_eq!(l.expiration_epoch, 1_893_600_000);
    }

    #[test]
    fn permanently_free_titles_are_skipped() {
        let mut v = free("Always Free", "BASE_GAME");
        v["price"]["totalPrice"]["originalPrice"] = json!(0);
        assert!(map_element(&element(v), &FinderConfig::default(), STORE, now()).is_none());
    }

    #[test]
    fn add_ons_follow_dlc_policy() {
        let el = element(free("Skin Pack", "ADD_ON"));
        let l = map_element(&el, &FinderConfig::default(), STORE, now()).unwrap();
        assert!(l.is_dlc);
        let cfg = FinderConfig {
            include_dlcs: false,
            ..FinderConfig::default()
        };
        assert!(map_element(&el, &cfg, STORE, now()).is_none());
    }

    #[test]
    fn url_falls_back_through_slugs() {
        let locale = Locale::default();
        let mut v = free("X", "BASE_GAME");
        v["productSlug"] = json!("[]");
        v["urlSlug"] = json!("x-offer");
        assert_eq!(listing_url(&element(v.clone()), STORE, &locale), format!("{STORE}en-US/p/x-offer"));

        v["urlSlug"] = json!(null);
        v["catalogNs"] = json!({"mappings": [{"pageSlug": "x-home", "pageType": "productHome"}]});
        assert_eq!(listing_url(&element(v.clone()), STORE, &locale), format!("{STORE}en-US/p/x-home"));

        v["catalogNs"] = json!(null);
        assert_eq!(listing_url(&element(v), STORE, &locale), STORE);
    }

    #[test]
    fn no_running_offer_means_sentinel() {
        let mut v = free("X", "BASE_GAME");
        v["promotions"] = json!(null);
        assert_eq!(offer_end(&element(v), now()), NO_EXPIRATION);
    }

    #[test]
    fn duplicate_titles_keep_the_first() {
        let mut second = free("Cool Game", "BASE_GAME");
        second["productSlug"] = json!("other");
        let els = vec![element(free("Cool Game", "BASE_GAME")), element(second)];
        let out = map_elements(&els, &FinderConfig::default(), STORE, now());
        assert_eq!(out.len(), 1);
        assert!(out[0].url.ends_with("/cool-game"));
    }
}
