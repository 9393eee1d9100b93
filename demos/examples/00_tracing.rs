use giveaway::{FinderConfig, Giveaway};
use giveaway_demos::common::get_adapters;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,giveaway=trace,giveaway_core=debug,giveaway_steam=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let cfg = FinderConfig::default();
    let finder = Giveaway::new(cfg.clone(), get_adapters(&cfg))?;

    // Blocking mode, then callback mode, so both span trees show up.
    let _ = finder.retrieve().await?;
    finder
        .retrieve_with(|_| {}, |e| tracing::warn!(error = %e, "retrieval problem"))
        .wait()
        .await;

    Ok(())
}
