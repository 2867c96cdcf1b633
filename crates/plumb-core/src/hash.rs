//! Stable hashing helpers for captured output.

use std::fmt::{self, Write as _};

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::schema::Schema;
use crate::types::{hash_scalar, Record};

/// 32-byte blake3 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Lowercase hex, 64 chars.
    pub fn to_hex(&self) -> String {
        self.0.iter().fold(String::with_capacity(64), |mut s, b| {
            let _ = write!(s, "{:02x}", b);
            s
        })
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    Hash256(blake3::hash(bytes).into())
}

/// Digest of the JSON encoding of `v`.
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256, Error> {
    Ok(hash_bytes(&serde_json::to_vec(v)?))
}

/// Digest of a schema plus an ordered record list.
///
/// Values are hashed by type tag and bit pattern, so NaN and -0.0 are stable.
pub fn hash_records(schema: &Schema, records: &[Record]) -> Result<Hash256, Error> {
    let mut h = Hasher::new();
    h.update(hash_serde(schema)?.0.as_slice());
    h.update(&(records.len() as u64).to_le_bytes());
    for record in records {
        h.update(&(record.len() as u64).to_le_bytes());
        for v in record {
            hash_scalar(v, &mut h);
        }
    }
    Ok(Hash256(h.finalize().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn record_order_changes_digest() {
        let s = Schema::untyped(["A"]);
        let a = hash_records(&s, &[record![1], record![2]]).unwrap();
        let b = hash_records(&s, &[record![2], record![1]]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, hash_records(&s, &[record![1], record![2]]).unwrap());
        assert_eq!(a.to_hex().len(), 64);
    }

    #[test]
    fn value_type_is_part_of_digest() {
        let s = Schema::untyped(["A"]);
        assert_ne!(
            hash_records(&s, &[record![1i32]]).unwrap(),
            hash_records(&s, &[record![1i64]]).unwrap()
        );
    }
}
