//! Identifiers for taps.
//!
//! Taps live for a single test, so ids only need to be unique, not ordered.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TapId(String);

impl TapId {
    /// `<kind>:<uuid v4>`, e.g. `Bucket:0b0c...`.
    pub fn random(kind: &str) -> Self {
        Self(format!("{}:{}", kind, uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_unique() {
        let a = TapId::random("Bucket");
        let b = TapId::random("Bucket");
        assert!(a.as_str().starts_with("Bucket:"));
        assert_ne!(a, b);
    }
}
