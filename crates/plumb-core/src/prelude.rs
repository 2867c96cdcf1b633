//! Convenient re-exports for downstream crates.

pub use crate::compare::{keys, Direction, RecordComparator, SortKey};
pub use crate::config::PlumbConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::id::TapId;
pub use crate::record;
pub use crate::schema::{cols, merge_cols, Col, DataType, Field, Schema};
pub use crate::types::{Entry, Group, Record, Scalar};
pub use crate::validate::validate_values;
