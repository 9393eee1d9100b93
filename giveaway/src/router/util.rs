use giveaway_core::GiveawayError;

/// Record recoverable degradations that have no caller-visible channel.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn log_degraded(degraded: &[GiveawayError]) {
    #[cfg(feature = "tracing")]
    for e in degraded {
        tracing::warn!(error = %e, "expiration degraded to sentinel");
    }
}
