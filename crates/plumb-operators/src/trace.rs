//! Lifecycle tracing hooks. Compiled to no-ops unless the `tracing` feature is on.

#[cfg(feature = "tracing")]
pub(crate) fn call(stub: &'static str, call: &'static str) {
    tracing::trace!(stub, call, "operation call");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn call(_stub: &'static str, _call: &'static str) { /* no-op */
}

#[cfg(feature = "tracing")]
pub(crate) fn completed(stub: &'static str, records: usize) {
    tracing::debug!(stub, records, "stub completed");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn completed(_stub: &'static str, _records: usize) { /* no-op */
}
