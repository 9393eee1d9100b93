use giveaway::{FinderConfig, Giveaway};
use giveaway_demos::common::{describe_expiration, get_adapters};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Default configuration: every platform, DLC included, en-US pricing.
    let cfg = FinderConfig::default();

    // 2. Register the adapters (mocks in CI when GIVEAWAY_DEMOS_USE_MOCK is set).
    let finder = Giveaway::new(cfg.clone(), get_adapters(&cfg))?;

    // 3. Wait for everything, expiration lookups included.
    let listings = finder.retrieve().await?;

    // 4. Print the result.
    println!("{} free listings", listings.len());
    for l in &listings {
        let kind = if l.is_dlc { "DLC" } else { "game" };
        println!(
            "[{}] {} ({kind}, was {}) {}",
            l.platform,
            l.title,
            l.original_price.as_deref().unwrap_or("?"),
            describe_expiration(l)
        );
        println!("    {}", l.url);
    }

    Ok(())
}
