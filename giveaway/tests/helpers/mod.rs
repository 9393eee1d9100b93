// Re-export helpers so tests can `use helpers::*;`
pub mod recording_sink;

pub use recording_sink::{Delivery, RecordingSink};

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use giveaway::{FinderConfig, Giveaway, Listing, Platform, SourceAdapter};

// ---------- Lightweight fixtures and helpers for tests ----------

/// A listing with only the identity fields filled in.
pub fn listing(title: &str, platform: Platform) -> Listing {
    Listing::new(
        title,
        platform,
        format!("https://example.test/{}", title.replace(' ', "-")),
    )
}

/// Default configuration with only `platforms` enabled.
pub fn cfg_with(platforms: &[Platform]) -> FinderConfig {
    FinderConfig {
        enabled_platforms: platforms.iter().copied().collect(),
        ..FinderConfig::default()
    }
}

/// Build an orchestrator, panicking on invalid test setup.
pub fn finder(cfg: FinderConfig, adapters: Vec<Arc<dyn SourceAdapter>>) -> Giveaway {
    Giveaway::new(cfg, adapters).expect("valid test setup")
}

/// Titles of `listings` as a set, for order-independent comparisons.
pub fn titles(listings: &[Listing]) -> BTreeSet<String> {
    listings.iter().map(|l| l.title.clone()).collect()
}

/// Set of owned strings from literals.
pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Short delay used for pending listings in tests.
pub const SHORT: Duration = Duration::from_millis(10);
