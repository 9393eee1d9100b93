use std::sync::Arc;

use giveaway_core::{FinderConfig, Platform, SourceAdapter};
use giveaway_epic::EpicAdapter;
use giveaway_gog::GogAdapter;
use giveaway_mock::MockAdapter;
use giveaway_steam::SteamAdapter;

/// Environment variable that switches the demos to offline mock adapters.
pub const USE_MOCK_ENV: &str = "GIVEAWAY_DEMOS_USE_MOCK";

/// Return the adapters for demos.
///
/// # Panics
/// Panics if an HTTP client cannot be built.
#[must_use]
pub fn get_adapters(cfg: &FinderConfig) -> Vec<Arc<dyn SourceAdapter>> {
    if std::env::var(USE_MOCK_ENV).is_ok() {
        println!("--- (Using Mock Adapters for CI) ---");
        return vec![
            Arc::new(MockAdapter::new(Platform::Steam)),
            Arc::new(MockAdapter::new(Platform::EpicGames)),
            Arc::new(MockAdapter::new(Platform::Gog)),
        ];
    }
    let shared = Arc::new(cfg.clone());
    vec![
        Arc::new(SteamAdapter::new_default(Arc::clone(&shared)).expect("steam http client")),
        Arc::new(EpicAdapter::new_default(Arc::clone(&shared)).expect("epic http client")),
        Arc::new(GogAdapter::new_default(shared).expect("gog http client")),
    ]
}

/// Render an expiration for humans.
#[must_use]
pub fn describe_expiration(listing: &giveaway_core::Listing) -> String {
    listing
        .expires_at()
        .map_or_else(|| "no known end".to_string(), |t| format!("until {}", t.format("%Y-%m-%d %H:%M UTC")))
}
