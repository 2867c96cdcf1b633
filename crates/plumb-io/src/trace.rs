//! Tap tracing hooks. No-ops unless the `tracing` feature is on.

#[cfg(feature = "tracing")]
pub(crate) fn open(mode: &'static str, id: &str) {
    tracing::trace!(mode, tap = %id, "open tap");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn open(_mode: &'static str, _id: &str) { /* no-op */
}

#[cfg(feature = "tracing")]
pub(crate) fn transferred(mode: &'static str, id: &str, records: usize) {
    tracing::debug!(mode, tap = %id, records, "tap transfer done");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn transferred(_mode: &'static str, _id: &str, _records: usize) { /* no-op */
}
