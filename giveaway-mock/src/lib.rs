//! Mock giveaway sources for tests and CI-safe demos.
//!
//! [`MockAdapter`] serves deterministic fixtures per platform.
//! [`DynamicMockAdapter`] is scripted at runtime through a
//! [`DynamicMockController`], and [`MockTier`] plugs scripted outcomes into an
//! expiration resolver.
#![warn(missing_docs)]

use async_trait::async_trait;
use giveaway_core::{GiveawayError, PartialResult, Platform, SourceAdapter};

mod dynamic;
mod fixtures;
mod tier;

pub use dynamic::{DynamicMockAdapter, DynamicMockController, MockBehavior, MockItem};
pub use tier::MockTier;

/// Mock adapter for CI-safe demos. Provides deterministic listings from static fixtures.
pub struct MockAdapter {
    platform: Platform,
    fail: bool,
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new(Platform::EpicGames)
    }
}

impl MockAdapter {
    /// Mock adapter serving the fixtures of `platform`.
    #[must_use]
    pub const fn new(platform: Platform) -> Self {
        Self {
            platform,
            fail: false,
        }
    }

    /// Mock adapter whose every fetch fails with a retrieval error.
    #[must_use]
    pub const fn failing(platform: Platform) -> Self {
        Self {
            platform,
            fail: true,
        }
    }

    /// The scripted items this adapter materializes on each fetch.
    #[must_use]
    pub fn fixtures(&self) -> Vec<MockItem> {
        fixtures::listings::by_platform(self.platform)
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        match self.platform {
            Platform::Steam => "giveaway-mock-steam",
            Platform::EpicGames => "giveaway-mock-epic",
            _ => "giveaway-mock-gog",
        }
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch(&self) -> Result<Vec<PartialResult>, GiveawayError> {
        if self.fail {
            return Err(GiveawayError::source_retrieval(
                self.platform.as_str(),
                "forced failure",
            ));
        }
        Ok(DynamicMockAdapter::materialize(self.fixtures(), None).await)
    }
}
