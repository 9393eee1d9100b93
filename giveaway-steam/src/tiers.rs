//! Steam-specific expiration tiers.
//!
//! Tried after the generic inline tier, in this order: the package lookup,
//! the publisher's event calendar, and finally the store page itself.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::America::Los_Angeles;
use scraper::{Html, Selector};

use giveaway_core::{
    ExpirationTier, GiveawayError, ListingContext, NO_EXPIRATION, PhraseMatch, PromotionalEvent,
    TierOutcome, find_active_event, parse_free_until,
};

use crate::adapter::SteamApi;
use crate::wire::{ClanEventRecord, EventJsonData};

/// Reads `discount_end_rtime` from the package carrying the discount.
pub struct PackageLookupTier {
    api: Arc<dyn SteamApi>,
}

impl PackageLookupTier {
    /// Stable tier name.
    pub const NAME: &'static str = "package-lookup";

    /// Create the tier over `api`.
    #[must_use]
    pub fn new(api: Arc<dyn SteamApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ExpirationTier for PackageLookupTier {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, ctx: &ListingContext) -> Result<TierOutcome, GiveawayError> {
        let Some(package_id) = ctx.package_id.as_deref() else {
            return Ok(TierOutcome::NotApplicable);
        };
        let details = self
            .api
            .package_details(package_id)
            .await
            .map_err(|e| GiveawayError::lookup(Self::NAME, e.to_string()))?;
        Ok(match details.map(|d| d.discount_end_rtime) {
            None | Some(None) => TierOutcome::NotApplicable,
            Some(Some(end)) if end > 0 => TierOutcome::Found(end),
            Some(Some(_)) => TierOutcome::Indeterminate,
        })
    }
}

/// Scans the publisher's upcoming events for one covering the listing.
///
/// Only consulted when the package lookup came back indeterminate, i.e. the
/// package exists but Steam hides its discount end.
pub struct ClanEventTier {
    api: Arc<dyn SteamApi>,
    clock: fn() -> DateTime<Utc>,
}

impl ClanEventTier {
    /// Stable tier name.
    pub const NAME: &'static str = "clan-events";

    /// Create the tier over `api`, using the system clock.
    #[must_use]
    pub fn new(api: Arc<dyn SteamApi>) -> Self {
        Self {
            api,
            clock: Utc::now,
        }
    }

    /// Replace the clock used to decide whether an event is still running.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl ExpirationTier for ClanEventTier {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn reachable_after(&self, previous: Option<&TierOutcome>) -> bool {
        matches!(previous, Some(TierOutcome::Indeterminate))
    }

    async fn attempt(&self, ctx: &ListingContext) -> Result<TierOutcome, GiveawayError> {
        let Some(clan_id) = ctx.publisher_id.as_deref() else {
            return Ok(TierOutcome::NotApplicable);
        };
        let records = self
            .api
            .clan_events(clan_id)
            .await
            .map_err(|e| GiveawayError::lookup(Self::NAME, e.to_string()))?;
        let events = records
            .iter()
            .filter_map(|r| to_event(r).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(find_active_event(&events, ctx, (self.clock)())
            .and_then(|e| e.end_epoch)
            .map_or(TierOutcome::NotApplicable, TierOutcome::Found))
    }
}

/// Convert one event record. Events without a positive end are skipped.
///
/// # Errors
/// Returns a `Lookup` error when `jsondata` is present but malformed.
pub fn to_event(record: &ClanEventRecord) -> Result<Option<PromotionalEvent>, GiveawayError> {
    let end = match record.rtime32_end_time {
        Some(end) if end > 0 => end,
        _ => return Ok(None),
    };
    let mut event = PromotionalEvent {
        name: record.event_name.clone(),
        end_epoch: Some(end),
        ..PromotionalEvent::default()
    };

    let raw = record.jsondata.as_deref().map(str::trim).unwrap_or("null");
    if raw.is_empty() || raw == "null" {
        return Ok(Some(event));
    }
    let data: EventJsonData = serde_json::from_str(raw).map_err(|e| {
        GiveawayError::lookup(
            ClanEventTier::NAME,
            format!("event '{}' jsondata: {e}", record.event_name),
        )
    })?;

    for capsule in data.sale_sections.iter().flat_map(|s| &s.capsules) {
        let Some(id) = capsule.id.clone() else {
            continue;
        };
        match capsule.kind.as_deref() {
            Some("game" | "dlc") => {
                event.apps.insert(id);
            }
            Some("sub") => {
                event.packages.insert(id);
            }
            Some("bundle") => {
                event.bundles.insert(id);
            }
            _ => {}
        }
    }
    Ok(Some(event))
}

/// Scrapes the "Free to keep when you get it before ..." line off the store page.
///
/// Last resort: a page without a usable phrase is reported as a scrape error.
pub struct StorePageTier {
    api: Arc<dyn SteamApi>,
}

impl StorePageTier {
    /// Stable tier name.
    pub const NAME: &'static str = "store-page";

    /// Create the tier over `api`.
    #[must_use]
    pub fn new(api: Arc<dyn SteamApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ExpirationTier for StorePageTier {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, ctx: &ListingContext) -> Result<TierOutcome, GiveawayError> {
        let Some(url) = ctx.url.as_deref() else {
            return Ok(TierOutcome::NotApplicable);
        };
        let html = self
            .api
            .store_page(url)
            .await
            .map_err(|e| GiveawayError::scrape(url, e.to_string()))?;
        match parse_free_until(&promotion_text(&html), Utc::now(), Los_Angeles) {
            PhraseMatch::Found(epoch) => Ok(TierOutcome::Found(epoch)),
            PhraseMatch::OpenEnded => Ok(TierOutcome::Found(NO_EXPIRATION)),
            PhraseMatch::NoMatch => Err(GiveawayError::scrape(url, "no free-until phrase on page")),
        }
    }
}

/// Text of the fully discounted purchase blocks, one line per element.
///
/// Falls back to the raw page when no purchase block is marked `-100%`.
#[must_use]
pub fn promotion_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let (Ok(block), Ok(pct), Ok(note)) = (
        Selector::parse("div.game_area_purchase_game"),
        Selector::parse("div.discount_pct"),
        Selector::parse("p.game_purchase_discount_quantity, p.game_purchase_discount_countdown"),
    ) else {
        return html.to_string();
    };

    let lines: Vec<String> = doc
        .select(&block)
        .filter(|b| {
            b.select(&pct)
                .any(|p| p.text().collect::<String>().trim() == "-100%")
        })
        .flat_map(|b| b.select(&note).collect::<Vec<_>>())
        .map(|p| {
            p.text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        html.to_string()
    } else {
        lines.join("\n")
    }
}
