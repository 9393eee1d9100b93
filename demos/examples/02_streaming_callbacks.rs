use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use giveaway::{FinderConfig, Giveaway};
use giveaway_demos::common::{describe_expiration, get_adapters};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = FinderConfig::default();
    let finder = Giveaway::new(cfg.clone(), get_adapters(&cfg))?;

    // Listings with a known end arrive first; the rest follow once their
    // lookups finish. Each adapter runs on its own task.
    let batches = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&batches);
    let handle = finder.retrieve_with(
        move |batch| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            println!("batch #{n}: {} listings", batch.len());
            for l in &batch {
                println!("  [{}] {} {}", l.platform, l.title, describe_expiration(l));
            }
        },
        |err| eprintln!("error: {err}"),
    );

    println!("running {} adapter tasks", handle.len());
    handle.wait().await;
    println!("done after {} batches", batches.load(Ordering::SeqCst));

    Ok(())
}
