use std::collections::{BTreeMap, HashSet};

use url::Url;

use giveaway_core::{
    FinderConfig, InlineDiscount, Listing, ListingContext, NO_EXPIRATION, Platform, Price,
};

use crate::adapter::SteamUrls;
use crate::wire::{ItemId, SearchResults, StoreItem};

const FILENAME_TOKEN: &str = "${FILENAME}";
const ASSET_FORMAT_KEY: &str = "asset_url_format";

/// Pull store ids out of search hits, in order, without duplicates.
///
/// Steam's search JSON carries no ids; they are embedded in the capsule URL
/// as `/apps/<id>/`, `/subs/<id>/` or `/bundles/<id>/`. Hits whose logo does
/// not match are dropped.
#[must_use]
pub fn extract_ids(results: &SearchResults) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    results
        .items
        .iter()
        .filter_map(|item| id_from_logo(&item.logo))
        .filter(|id| seen.insert(*id))
        .collect()
}

fn id_from_logo(logo: &str) -> Option<ItemId> {
    let url = Url::parse(logo).ok()?;
    let segments: Vec<&str> = url.path_segments()?.collect();
    segments.windows(2).find_map(|pair| {
        let id: u64 = pair[1].parse().ok()?;
        match pair[0] {
            "apps" => Some(ItemId::App(id)),
            "subs" => Some(ItemId::Package(id)),
            "bundles" => Some(ItemId::Bundle(id)),
            _ => None,
        }
    })
}

/// Whether the item's best purchase option is fully discounted.
#[must_use]
pub fn is_free(item: &StoreItem) -> bool {
    item.best_purchase_option
        .as_ref()
        .and_then(|p| p.discount_pct)
        == Some(100)
}

/// Whether the item is downloadable content of another app.
#[must_use]
pub fn is_dlc(item: &StoreItem) -> bool {
    item.related_items
        .as_ref()
        .and_then(|r| r.parent_appid)
        .is_some()
}

/// Turn a store item into a listing plus the ids the resolution tiers need.
///
/// Returns `None` for items that are not free, have no name, or are DLC
/// while DLC is excluded. The listing's expiration starts as the sentinel.
#[must_use]
pub fn map_item(
    item: &StoreItem,
    cfg: &FinderConfig,
    urls: &SteamUrls,
) -> Option<(Listing, ListingContext)> {
    if !is_free(item) || item.name.trim().is_empty() {
        return None;
    }
    let dlc = is_dlc(item);
    if dlc && !cfg.include_dlcs {
        return None;
    }

    let url = item
        .store_url_path
        .as_deref()
        .map(|path| format!("{}{}", urls.store, path.trim_start_matches('/')))
        .unwrap_or_default();

    let mut listing = Listing::new(item.name.trim(), Platform::Steam, url);
    listing.is_dlc = dlc;
    listing.description = item
        .basic_info
        .as_ref()
        .and_then(|b| b.short_description.clone())
        .filter(|d| !d.trim().is_empty());
    listing.store_media = store_media(item, &urls.cdn);
    listing.media = screenshots(item, &urls.cdn, cfg.allow_mature_content);
    listing.expiration_epoch = NO_EXPIRATION;

    let purchase = item.best_purchase_option.as_ref();
    let full_price = purchase.and_then(|p| p.original_price_in_cents);
    listing.original_price =
        full_price.map(|cents| Price::new(cents, 2, cfg.locale.currency.clone()).to_string());

    let own_id = item.id.map(|id| id.to_string());
    let (app_id, own_package, own_bundle) = match item.item_type {
        Some(1) => (None, own_id, None),
        Some(2) => (None, None, own_id),
        _ => (item.appid.map(|id| id.to_string()).or(own_id), None, None),
    };

    let mut ctx = ListingContext::for_listing(&listing);
    ctx.listing_id = app_id;
    ctx.package_id = purchase
        .and_then(|p| p.packageid)
        .map(|id| id.to_string())
        .or(own_package);
    ctx.bundle_id = purchase
        .and_then(|p| p.bundleid)
        .map(|id| id.to_string())
        .or(own_bundle);
    ctx.publisher_id = item
        .basic_info
        .as_ref()
        .and_then(|b| b.publishers.iter().find_map(|p| p.creator_clan_account_id))
        .map(|id| id.to_string());
    ctx.full_price = full_price;
    ctx.inline_discounts = purchase
        .map(|p| {
            p.active_discounts
                .iter()
                .map(|d| InlineDiscount {
                    amount: d.discount_amount,
                    end_epoch: d.discount_end_date,
                })
                .collect()
        })
        .unwrap_or_default();

    Some((listing, ctx))
}

fn store_media(item: &StoreItem, cdn: &str) -> BTreeMap<String, String> {
    let Some(assets) = item.assets.as_ref() else {
        return BTreeMap::new();
    };
    let Some(format) = assets.get(ASSET_FORMAT_KEY).and_then(|v| v.as_str()) else {
        return BTreeMap::new();
    };
    assets
        .iter()
        .filter(|(key, _)| key.as_str() != ASSET_FORMAT_KEY)
        .filter_map(|(key, value)| {
            let file = value.as_str().filter(|f| f.contains('.'))?;
            Some((
                key.clone(),
                format!("{cdn}{}", format.replace(FILENAME_TOKEN, file)),
            ))
        })
        .collect()
}

fn screenshots(item: &StoreItem, cdn: &str, allow_mature: bool) -> Vec<String> {
    let Some(shots) = item.screenshots.as_ref() else {
        return Vec::new();
    };
    let mature: &[_] = if allow_mature {
        &shots.mature_content_screenshots
    } else {
        &[]
    };
    shots
        .all_ages_screenshots
        .iter()
        .chain(mature)
        .filter_map(|s| s.filename.as_deref())
        .filter(|f| !f.is_empty())
        .map(|f| format!("{cdn}{f}"))
        .collect()
}
