use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tier::ListingContext;

/// A publisher-run promotion and the storefront ids it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionalEvent {
    /// Event title as published.
    pub name: String,
    /// Event end as Unix seconds, if the event has one.
    pub end_epoch: Option<i64>,
    /// Covered app ids (games and DLC).
    pub apps: BTreeSet<String>,
    /// Covered package ids.
    pub packages: BTreeSet<String>,
    /// Covered bundle ids.
    pub bundles: BTreeSet<String>,
}

impl PromotionalEvent {
    /// Whether any of the context's identifiers appear in this event.
    #[must_use]
    pub fn covers(&self, ctx: &ListingContext) -> bool {
        let hit = |set: &BTreeSet<String>, id: Option<&String>| id.is_some_and(|i| set.contains(i));
        hit(&self.apps, ctx.listing_id.as_ref())
            || hit(&self.packages, ctx.package_id.as_ref())
            || hit(&self.bundles, ctx.bundle_id.as_ref())
    }

    /// Whether the event ends strictly after `now_epoch` (Unix seconds).
    #[must_use]
    pub fn is_active_at(&self, now_epoch: i64) -> bool {
        self.end_epoch.is_some_and(|end| end > now_epoch)
    }
}

/// First event, in the order given, that covers `ctx` and has not ended yet.
///
/// Events without an end time, or whose end lies at or before `now`, are
/// skipped even when their id sets match.
#[must_use]
pub fn find_active_event<'a>(
    events: &'a [PromotionalEvent],
    ctx: &ListingContext,
    now: DateTime<Utc>,
) -> Option<&'a PromotionalEvent> {
    let now_epoch = now.timestamp();
    events
        .iter()
        .find(|e| e.covers(ctx) && e.is_active_at(now_epoch))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, end: Option<i64>, apps: &[&str]) -> PromotionalEvent {
        PromotionalEvent {
            name: name.into(),
            end_epoch: end,
            apps: apps.iter().map(|s| (*s).to_string()).collect(),
            ..PromotionalEvent::default()
        }
    }

    fn app_ctx(id: &str) -> ListingContext {
        ListingContext {
            listing_id: Some(id.into()),
            ..ListingContext::default()
        }
    }

    fn at(epoch: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(epoch, 0).expect("valid epoch")
    }

    #[test]
    fn past_event_is_skipped_even_when_it_matches() {
        let events = vec![event("old", Some(1_000), &["10"])];
        assert!(find_active_event(&events, &app_ctx("10"), at(2_000)).is_none());
    }

    #[test]
    fn event_ending_exactly_now_is_skipped() {
        let events = vec![event("edge", Some(2_000), &["10"])];
        assert!(find_active_event(&events, &app_ctx("10"), at(2_000)).is_none());
    }

    #[test]
    fn first_future_match_wins_in_source_order() {
        let events = vec![
            event("unrelated", Some(9_000), &["99"]),
            event("expired", Some(1_000), &["10"]),
            event("first", Some(5_000), &["10"]),
            event("second", Some(8_000), &["10"]),
        ];
        let hit = find_active_event(&events, &app_ctx("10"), at(2_000)).expect("match");
        assert_eq!(hit.name, "first");
    }

    #[test]
    fn package_and_bundle_ids_match_their_own_sets() {
        let mut e = event("sale", Some(5_000), &[]);
        e.packages.insert("77".into());
        e.bundles.insert("55".into());
        let events = vec![e];

        let pkg = ListingContext {
            package_id: Some("77".into()),
            ..ListingContext::default()
        };
        let bundle = ListingContext {
            bundle_id: Some("55".into()),
            ..ListingContext::default()
        };
        let app_with_pkg_id = app_ctx("77");

        assert!(find_active_event(&events, &pkg, at(0)).is_some());
        assert!(find_active_event(&events, &bundle, at(0)).is_some());
        assert!(find_active_event(&events, &app_with_pkg_id, at(0)).is_none());
    }

    #[test]
    fn event_without_end_never_qualifies() {
        let events = vec![event("open", None, &["10"])];
        assert!(find_active_event(&events, &app_ctx("10"), at(0)).is_none());
    }
}
