use giveaway_core::{FinderConfig, Listing, Locale, Platform};

use crate::wire::Product;

const SCREENSHOT_FORMATTER: &str = "_{formatter}";

/// Product types requested from the catalog.
#[must_use]
pub fn product_types(include_dlcs: bool) -> &'static str {
    if include_dlcs {
        "game,pack,dlc,extras"
    } else {
        "game,pack"
    }
}

/// Whether a product type denotes add-on content.
#[must_use]
pub fn is_dlc_type(product_type: &str) -> bool {
    ["dlc", "extra", "extras"]
        .iter()
        .any(|t| product_type.eq_ignore_ascii_case(t))
}

/// Whether the catalog reports the product as free right now.
///
/// Section products carry no price and are free by construction.
#[must_use]
pub fn is_free(product: &Product) -> bool {
    product
        .price
        .as_ref()
        .and_then(|p| p.final_money.as_ref())
        .and_then(|m| m.amount)
        .is_none_or(|amount| amount.is_zero())
}

/// Game page, e.g. `https://www.gog.com/en/game/<slug>`.
#[must_use]
pub fn listing_url(store: &str, locale: &Locale, slug: &str) -> String {
    format!("{store}{}/game/{slug}", locale.language)
}

/// Usable screenshot URLs with the size placeholder removed.
#[must_use]
pub fn screenshots(product: &Product) -> Vec<String> {
    product
        .screenshots
        .iter()
        .map(|s| s.replace(SCREENSHOT_FORMATTER, ""))
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Convert a catalog or section product into a listing without expiration.
///
/// Returns `None` for products without a title or slug, products that are not
/// free, and DLC while DLC is excluded.
#[must_use]
pub fn map_product(product: &Product, cfg: &FinderConfig, store: &str) -> Option<Listing> {
    let title = product.title.trim();
    let slug = product.slug.trim();
    if title.is_empty() || slug.is_empty() || !is_free(product) {
        return None;
    }
    let dlc = is_dlc_type(&product.product_type);
    if dlc && !cfg.include_dlcs {
        return None;
    }

    let mut listing = Listing::new(title, Platform::Gog, listing_url(store, &cfg.locale, slug));
    listing.is_dlc = dlc;
    for (key, value) in [
        ("coverHorizontal", &product.cover_horizontal),
        ("coverVertical", &product.cover_vertical),
    ] {
        if let Some(url) = value.as_deref().filter(|u| !u.trim().is_empty()) {
            listing.store_media.insert(key.to_string(), url.to_string());
        }
    }
    listing.media = screenshots(product);
    Some(listing)
}
