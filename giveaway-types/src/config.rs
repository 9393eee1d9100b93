//! Configuration shared by the orchestrator, adapters and resolvers.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{GiveawayError, Platform};

/// What the callback-mode orchestrator does with a pending join that
/// contains at least one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PendingFailurePolicy {
    /// Report the failures and drop the whole pending batch for that adapter.
    #[default]
    DiscardBatch,
    /// Report the failures and still deliver the listings that did complete.
    DeliverSuccesses,
}

/// Language, country and currency forwarded to storefront queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Lowercase ISO 639-1 language code, e.g. "en".
    pub language: String,
    /// Uppercase ISO 3166-1 alpha-2 country code, e.g. "US".
    pub country: String,
    /// ISO 4217 currency code used when formatting prices.
    pub currency: String,
}

impl Locale {
    /// Build a locale, normalizing case.
    pub fn new(
        language: impl Into<String>,
        country: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            country: country.into().to_ascii_uppercase(),
            currency: currency.into().to_ascii_uppercase(),
        }
    }

    /// Parse a `language-COUNTRY` (or `language_COUNTRY`) tag.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the tag does not have exactly two non-empty parts.
    pub fn from_tag(tag: &str, currency: impl Into<String>) -> Result<Self, GiveawayError> {
        let mut parts = tag.split(['-', '_']);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(lang), Some(country), None) if !lang.is_empty() && !country.is_empty() => {
                Ok(Self::new(lang, country, currency))
            }
            _ => Err(GiveawayError::InvalidArg(format!("malformed locale tag: {tag}"))),
        }
    }

    /// `language-COUNTRY`, e.g. "en-US".
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}-{}", self.language, self.country)
    }

    /// English language name used by APIs that take one (e.g. "english").
    #[must_use]
    pub fn language_name(&self) -> &'static str {
        match self.language.as_str() {
            "de" => "german",
            "es" => "spanish",
            "fr" => "french",
            "it" => "italian",
            "ja" => "japanese",
            "ko" => "koreana",
            "pl" => "polish",
            "pt" => "brazilian",
            "ru" => "russian",
            "zh" => "schinese",
            _ => "english",
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", "US", "USD")
    }
}

/// Global configuration for the `Giveaway` orchestrator and its adapters.
///
/// Passed by value into the orchestrator and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Platforms whose adapters may be invoked. Adapters for other platforms are skipped.
    pub enabled_platforms: BTreeSet<Platform>,
    /// Include DLC listings alongside base games.
    pub include_dlcs: bool,
    /// Include screenshots flagged as mature content.
    pub allow_mature_content: bool,
    /// Locale forwarded to adapters and used for price formatting.
    pub locale: Locale,
    /// Bound on expiration lookups that need network I/O, per listing.
    pub resolution_timeout: Duration,
    /// Consult publisher event calendars when a package reports no end time.
    pub use_event_calendar: bool,
    /// Optional bound on a single adapter's primary fetch.
    pub adapter_timeout: Option<Duration>,
    /// Callback-mode handling of pending batches that contain failures.
    pub pending_failure: PendingFailurePolicy,
}

impl FinderConfig {
    /// Whether adapters for `platform` may run.
    #[must_use]
    pub fn is_enabled(&self, platform: Platform) -> bool {
        self.enabled_platforms.contains(&platform)
    }

    /// Validate invariants that cannot be expressed in the type.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a zero resolution timeout or a zero adapter timeout.
    pub fn validate(&self) -> Result<(), GiveawayError> {
        if self.resolution_timeout.is_zero() {
            return Err(GiveawayError::InvalidArg(
                "resolution_timeout must be greater than zero".into(),
            ));
        }
        if self.adapter_timeout.is_some_and(|t| t.is_zero()) {
            return Err(GiveawayError::InvalidArg(
                "adapter_timeout must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            enabled_platforms: Platform::ALL.into_iter().collect(),
            include_dlcs: true,
            allow_mature_content: false,
            locale: Locale::default(),
            resolution_timeout: Duration::from_secs(8),
            use_event_calendar: true,
            adapter_timeout: None,
            pending_failure: PendingFailurePolicy::default(),
        }
    }
}
