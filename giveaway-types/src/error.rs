use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the giveaway workspace.
///
/// Wraps source-level retrieval failures, recoverable expiration-resolution
/// degradations, pending-work failures, and an aggregate for runs that collect
/// more than one failure.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GiveawayError {
    /// A source adapter failed to obtain or parse its primary data.
    #[error("{platform} retrieval failed: {msg}")]
    SourceRetrieval {
        /// Platform label of the failing adapter (e.g. "steam").
        platform: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A source adapter call exceeded the configured adapter timeout.
    #[error("{platform} retrieval timed out after {timeout_ms}ms")]
    AdapterTimeout {
        /// Platform label of the adapter that timed out.
        platform: String,
        /// Configured bound in milliseconds.
        timeout_ms: u64,
    },

    /// Expiration resolution for one listing exceeded its bound.
    #[error("expiration lookup for '{listing}' timed out after {timeout_ms}ms")]
    ResolutionTimeout {
        /// Title of the listing being resolved.
        listing: String,
        /// Configured bound in milliseconds.
        timeout_ms: u64,
    },

    /// The store-page scrape could not be fetched or yielded no usable text.
    #[error("scrape of {url} failed: {msg}")]
    Scrape {
        /// Page that was being scraped.
        url: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A non-terminal resolution tier failed its lookup.
    #[error("{tier} lookup failed: {msg}")]
    Lookup {
        /// Name of the tier that failed.
        tier: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A pending listing could not be completed.
    #[error("pending listing '{listing}' from {platform} failed: {msg}")]
    PendingFailed {
        /// Platform label of the adapter that produced the pending listing.
        platform: String,
        /// Label of the pending listing (usually its title).
        listing: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Issues with the returned or expected data (missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),

    /// Several failures collected during one run.
    #[error("multiple failures: {0:?}")]
    AllFailed(Vec<GiveawayError>),
}

impl GiveawayError {
    /// Helper: build a `SourceRetrieval` error for a platform label and message.
    pub fn source_retrieval(platform: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::SourceRetrieval {
            platform: platform.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Scrape` error.
    pub fn scrape(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Scrape {
            url: url.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Lookup` error.
    pub fn lookup(tier: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Lookup {
            tier: tier.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ResolutionTimeout` error.
    #[must_use]
    pub fn resolution_timeout(listing: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::ResolutionTimeout {
            listing: listing.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Helper: build an `AdapterTimeout` error.
    #[must_use]
    pub fn adapter_timeout(platform: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::AdapterTimeout {
            platform: platform.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Helper: build a `PendingFailed` error.
    pub fn pending_failed(
        platform: impl Into<String>,
        listing: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::PendingFailed {
            platform: platform.into(),
            listing: listing.into(),
            msg: msg.into(),
        }
    }

    /// Returns true if this error only degraded a listing's expiration field.
    ///
    /// Recoverable errors never drop a listing: the listing is still delivered
    /// with the `NO_EXPIRATION` sentinel. Aggregates are recoverable only if
    /// every inner error is.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ResolutionTimeout { .. } | Self::Scrape { .. } | Self::Lookup { .. } => true,
            Self::AllFailed(inner) => !inner.is_empty() && inner.iter().all(Self::is_recoverable),
            _ => false,
        }
    }

    /// Flatten nested `AllFailed` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }

    /// Collapse a list of errors into a single error.
    ///
    /// A single error is returned as-is, several become `AllFailed`, and an
    /// empty list yields `None`.
    #[must_use]
    pub fn collapse(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::AllFailed(errors)),
        }
    }
}

impl From<serde_json::Error> for GiveawayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Data(err.to_string())
    }
}
