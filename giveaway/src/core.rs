use std::collections::HashSet;
#[cfg(feature = "tracing")]
use std::convert::TryFrom;
use std::sync::Arc;
use std::time::Duration;

use giveaway_core::{FinderConfig, GiveawayError, PartialResult, Platform, SourceAdapter};

/// Orchestrator that drives every enabled source adapter and assembles their listings.
pub struct Giveaway {
    pub(crate) adapters: Vec<Arc<dyn SourceAdapter>>,
    pub(crate) cfg: Arc<FinderConfig>,
}

impl std::fmt::Debug for Giveaway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Giveaway")
            .field(
                "adapters",
                &self.adapters.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .field("cfg", &self.cfg)
            .finish()
    }
}

/// Map an adapter error into the error surfaced for that adapter's run.
///
/// Errors that already name their platform pass through; anything else is
/// reported as a retrieval failure of `platform`.
pub fn tag_err(platform: Platform, e: GiveawayError) -> GiveawayError {
    match e {
        e @ (GiveawayError::SourceRetrieval { .. }
        | GiveawayError::AdapterTimeout { .. }
        | GiveawayError::PendingFailed { .. }
        | GiveawayError::AllFailed(_)) => e,
        other => GiveawayError::source_retrieval(platform.as_str(), other.to_string()),
    }
}

impl Giveaway {
    /// Create an orchestrator over `adapters`, configured by `cfg`.
    ///
    /// Behavior and trade-offs:
    /// - The configuration is frozen for the lifetime of the orchestrator and
    ///   shared read-only with every run; build a new `Giveaway` to change it.
    /// - Adapters keep their registration order. The blocking call visits them
    ///   in that order; the callback call runs them concurrently.
    /// - Adapters whose platform is not enabled stay registered but are never invoked.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no adapters are given, if two adapters report
    /// the same `name()`, or if `cfg` fails validation.
    pub fn new(
        cfg: FinderConfig,
        adapters: Vec<Arc<dyn SourceAdapter>>,
    ) -> Result<Self, GiveawayError> {
        if adapters.is_empty() {
            return Err(GiveawayError::InvalidArg(
                "no adapters registered; pass at least one source adapter".to_string(),
            ));
        }
        let mut seen: HashSet<&'static str> = HashSet::new();
        for a in &adapters {
            if !seen.insert(a.name()) {
                return Err(GiveawayError::InvalidArg(format!(
                    "adapter '{}' registered twice",
                    a.name()
                )));
            }
        }
        cfg.validate()?;

        Ok(Self {
            adapters,
            cfg: Arc::new(cfg),
        })
    }

    /// The configuration this orchestrator was built with.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.cfg
    }

    /// Names of all registered adapters, in registration order.
    pub fn adapter_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.adapters.iter().map(|a| a.name())
    }

    pub(crate) fn enabled_adapters(&self) -> Vec<Arc<dyn SourceAdapter>> {
        self.adapters
            .iter()
            .filter(|a| self.cfg.is_enabled(a.platform()))
            .cloned()
            .collect()
    }

    /// Invoke one adapter, bounded by the optional adapter timeout.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "giveaway::core::adapter_call",
            skip(adapter),
            fields(
                adapter = adapter.name(),
                platform = %adapter.platform(),
                timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
            ),
        )
    )]
    pub(crate) async fn adapter_call_with_timeout(
        adapter: &dyn SourceAdapter,
        timeout: Option<Duration>,
    ) -> Result<Vec<PartialResult>, GiveawayError> {
        let platform = adapter.platform();
        let res = match timeout {
            Some(t) => tokio::time::timeout(t, adapter.fetch())
                .await
                .unwrap_or_else(|_| Err(GiveawayError::adapter_timeout(platform.as_str(), t))),
            None => adapter.fetch().await,
        };
        match res {
            Ok(batch) => Ok(batch),
            Err(e) => {
                let e = tag_err(platform, e);
                #[cfg(feature = "tracing")]
                tracing::warn!(adapter = adapter.name(), error = %e, "adapter failed");
                Err(e)
            }
        }
    }
}
