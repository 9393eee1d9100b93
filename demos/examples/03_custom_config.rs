use std::collections::BTreeSet;
use std::time::Duration;

use giveaway::{FinderConfig, Giveaway, Locale, PendingFailurePolicy, Platform};
use giveaway_demos::common::get_adapters;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Steam only, no DLC, German storefront, tighter lookup bounds.
    let cfg = FinderConfig {
        enabled_platforms: BTreeSet::from([Platform::Steam]),
        include_dlcs: false,
        locale: Locale::from_tag("de-DE", "EUR")?,
        resolution_timeout: Duration::from_secs(3),
        use_event_calendar: false,
        adapter_timeout: Some(Duration::from_secs(20)),
        pending_failure: PendingFailurePolicy::DeliverSuccesses,
        ..FinderConfig::default()
    };

    let finder = Giveaway::new(cfg.clone(), get_adapters(&cfg))?;
    let listings = finder.retrieve().await?;

    for l in &listings {
        println!("[{}] {} {}", l.platform, l.title, l.url);
    }
    println!("{} listings", listings.len());

    Ok(())
}
