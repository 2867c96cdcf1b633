//! Multi-key, null-aware record ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{Col, Schema};
use crate::types::{scalar_cmp, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// One sort key: a column plus a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub col: Col,
    pub direction: Direction,
}

impl SortKey {
    pub fn asc(col: impl Into<Col>) -> Self {
        Self {
            col: col.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(col: impl Into<Col>) -> Self {
        Self {
            col: col.into(),
            direction: Direction::Descending,
        }
    }
}

macro_rules! sort_key_from {
    ($t:ty) => {
        impl From<$t> for SortKey {
            fn from(col: $t) -> Self {
                SortKey::asc(col)
            }
        }
    };
}

sort_key_from!(Col);
sort_key_from!(&str);
sort_key_from!(String);
sort_key_from!(usize);

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{}", self.col),
            Direction::Descending => write!(f, "{} desc", self.col),
        }
    }
}

/// Build an ascending sort-key list, e.g. `keys(["A", "B"])`.
pub fn keys<I, K>(items: I) -> Vec<SortKey>
where
    I: IntoIterator<Item = K>,
    K: Into<SortKey>,
{
    items.into_iter().map(Into::into).collect()
}

/// Lexicographic comparator over a subset of a schema's columns.
///
/// A null sorts strictly before any non-null value in the same column, in
/// either direction; two nulls are equal and comparison moves on.
#[derive(Debug, Clone)]
pub struct RecordComparator {
    keys: Vec<(usize, Direction)>,
}

impl RecordComparator {
    pub fn new(schema: &Schema, sort_keys: &[SortKey]) -> Result<Self> {
        let keys = sort_keys
            .iter()
            .map(|k| {
                schema
                    .resolve(&k.col)
                    .map(|idx| (idx, k.direction))
                    .map_err(|_| {
                        Error::Arity(format!(
                            "declared fields must contain sort fields: sort field '{}' not in {}",
                            k.col, schema
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for &(idx, direction) in &self.keys {
            let (x, y) = (&a[idx], &b[idx]);
            let ord = match (x.is_null(), y.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => match direction {
                    Direction::Ascending => scalar_cmp(x, y),
                    Direction::Descending => scalar_cmp(y, x),
                },
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Stable in-place sort.
    pub fn sort(&self, records: &mut [Record]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}
