//! Product card scraping.
//!
//! GOG game pages carry their product data in an inline script rather than
//! in markup:
//!
//! ```text
//! cardProduct: {"id":1,"description":"<p>...</p>","price":{"baseAmount":"9.99"}, ...},
//! currency: "USD",
//! window.productcardData.cardProductPromoEndDate = {"date":"2024-06-10 13:00:00.000000","timezone":"UTC"};
//! ```
//!
//! Each assignment sits on one line, so the values are cut out with
//! line-anchored patterns and decoded with `serde_json`.

use std::sync::OnceLock;

use chrono::{FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use regex::Regex;
use scraper::{Html, Node};

use giveaway_core::{Listing, Locale, NO_EXPIRATION, Price};

use crate::wire::{CardProduct, PromoEnd};

const PROMO_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DISCLAIMER_CLASS: &str = "module";
const BLOCK_ELEMENTS: [&str; 10] = ["p", "div", "li", "ul", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Data extracted from a game page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCard {
    /// The `cardProduct` object.
    pub product: CardProduct,
    /// Currency of `product.price`, when the page states one.
    pub currency: Option<String>,
    /// Promotion end, when the page states one.
    pub promo_end: Option<PromoEnd>,
}

static CARD_PRODUCT: OnceLock<Option<Regex>> = OnceLock::new();
static CURRENCY: OnceLock<Option<Regex>> = OnceLock::new();
static PROMO_END: OnceLock<Option<Regex>> = OnceLock::new();
static BLANK_RUNS: OnceLock<Option<Regex>> = OnceLock::new();

fn pattern(cell: &'static OnceLock<Option<Regex>>, re: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(re).ok()).as_ref()
}

fn capture<'h>(re: Option<&Regex>, haystack: &'h str) -> Option<&'h str> {
    re?.captures(haystack)?.get(1).map(|m| m.as_str())
}

/// Cut the product card out of a game page.
///
/// # Errors
/// Returns a message when `cardProduct` is missing or is not valid JSON. A
/// missing currency or promotion end is not an error.
pub fn extract_card(html: &str) -> Result<ProductCard, String> {
    let raw = capture(
        pattern(&CARD_PRODUCT, r"(?m)^\s*cardProduct:\s*(\{.*\})"),
        html,
    )
    .ok_or_else(|| "cardProduct not found".to_string())?;
    let product: CardProduct =
        serde_json::from_str(raw).map_err(|e| format!("cardProduct: {e}"))?;

    let currency = capture(pattern(&CURRENCY, r#"(?m)^\s*currency:\s*"([^"]*)""#), html)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let promo_end = capture(
        pattern(
            &PROMO_END,
            r"(?m)^\s*window\.productcardData\.cardProductPromoEndDate\s*=\s*(\{.*\})",
        ),
        html,
    )
    .and_then(|raw| serde_json::from_str::<PromoEnd>(raw).ok());

    Ok(ProductCard {
        product,
        currency,
        promo_end,
    })
}

/// Unix seconds of the promotion end, or `NO_EXPIRATION`.
///
/// The zone may be an IANA id (`Europe/Nicosia`), `UTC`, or a fixed offset
/// (`+02:00`). Ambiguous local times take the earliest instant.
#[must_use]
pub fn promo_end_epoch(promo: &PromoEnd) -> i64 {
    let (Some(date), Some(zone)) = (promo.date.as_deref(), promo.timezone.as_deref()) else {
        return NO_EXPIRATION;
    };
    let Ok(naive) = NaiveDateTime::parse_from_str(date.trim(), PROMO_DATE_FORMAT) else {
        return NO_EXPIRATION;
    };
    let zone = zone.trim();
    let epoch = if let Ok(tz) = zone.parse::<Tz>() {
        tz.from_local_datetime(&naive).earliest().map(|t| t.timestamp())
    } else if let Ok(offset) = zone.parse::<FixedOffset>() {
        offset.from_local_datetime(&naive).earliest().map(|t| t.timestamp())
    } else {
        None
    };
    giveaway_core::normalize_epoch(epoch.unwrap_or(NO_EXPIRATION))
}

/// Plain-text description from the card's HTML.
///
/// Paragraphs with the `module` class are store disclaimers and are dropped.
/// Block elements and `<br>` become line breaks, and runs of blank lines are
/// capped at one.
#[must_use]
pub fn plain_description(html: &str) -> String {
    let doc = Html::parse_fragment(&html.replace('\n', "<br>"));
    let mut out = String::new();
    for node in doc.root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let in_disclaimer = node.ancestors().any(|a| {
                    a.value().as_element().is_some_and(|el| {
                        el.name() == "p" && el.classes().any(|c| c == DISCLAIMER_CLASS)
                    })
                });
                if !in_disclaimer {
                    out.push_str(text);
                }
            }
            Node::Element(el) if el.name() == "br" || BLOCK_ELEMENTS.contains(&el.name()) => {
                out.push('\n');
            }
            _ => {}
        }
    }
    let collapsed = match pattern(&BLANK_RUNS, r"(\n[ \t]*){3,}") {
        Some(re) => re.replace_all(&out, "\n\n").into_owned(),
        None => out,
    };
    collapsed.trim().to_string()
}

/// Copy what the card knows onto `listing`.
///
/// A zero base price means GOG does not sell the title in this locale, so no
/// price is set.
pub fn apply_card(listing: &mut Listing, card: &ProductCard, locale: &Locale) {
    let product = &card.product;

    if let Some(desc) = product.description.as_deref() {
        let text = plain_description(desc);
        if !text.is_empty() {
            listing.description = Some(text);
        }
    }

    if let Some(base) = product.price.as_ref().and_then(|p| p.base_amount) {
        if base > rust_decimal::Decimal::ZERO {
            let mut amount = base.round_dp(2);
            amount.rescale(2);
            if let Ok(minor) = i64::try_from(amount.mantissa()) {
                let currency = card.currency.as_deref().unwrap_or(&locale.currency);
                listing.original_price = Some(Price::new(minor, 2, currency).to_string());
            }
        }
    }

    for (key, value) in [
        ("backgroundImage", &product.background_image),
        ("boxArtImage", &product.box_art_image),
        ("galaxyBackgroundImage", &product.galaxy_background_image),
        ("logo", &product.logo),
    ] {
        if let Some(url) = value.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            listing.store_media.insert(key.to_string(), url.to_string());
        }
    }

    listing.expiration_epoch = card
        .promo_end
        .as_ref()
        .map_or(NO_EXPIRATION, promo_end_epoch);
}
