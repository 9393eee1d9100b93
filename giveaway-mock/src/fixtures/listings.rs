use std::time::Duration;

use giveaway_core::{Listing, Platform};

use crate::MockItem;

// 2030-01-01T17:00:00Z, far enough out to stay "in the future" for demos.
const FIXED_END: i64 = 1_893_517_200;

fn listing(title: &str, platform: Platform, slug: &str, price: &str) -> Listing {
    let base = match platform {
        Platform::Steam => "https://store.steampowered.com/app",
        Platform::EpicGames => "https://store.epicgames.com/en-US/p",
        _ => "https://www.gog.com/en/game",
    };
    let mut l = Listing::new(title, platform, format!("{base}/{slug}"));
    l.description = Some(format!("{title} is free for a limited time."));
    l.original_price = Some(price.to_string());
    l.store_media
        .insert("header".into(), format!("https://cdn.example.test/{slug}/header.jpg"));
    l.media
        .push(format!("https://cdn.example.test/{slug}/screenshot_1.jpg"));
    l
}

pub fn by_platform(platform: Platform) -> Vec<MockItem> {
    match platform {
        Platform::EpicGames => {
            let mut ready = listing("Game 1", platform, "game-1", "$24.99");
            ready.expiration_epoch = FIXED_END;
            vec![
                MockItem::Ready(ready),
                MockItem::pending(
                    listing("Game 2", platform, "game-2", "$14.99"),
                    Duration::from_millis(20),
                    FIXED_END,
                ),
            ]
        }
        Platform::Steam => {
            let mut dlc = listing("Soundtrack DLC", platform, "480", "$4.99");
            dlc.is_dlc = true;
            vec![
                MockItem::Ready(dlc),
                MockItem::pending(
                    listing("Space Game", platform, "220", "$9.99"),
                    Duration::from_millis(30),
                    FIXED_END,
                ),
            ]
        }
        _ => vec![MockItem::Ready(listing(
            "Retro Classic",
            platform,
            "retro_classic",
            "$5.99",
        ))],
    }
}
