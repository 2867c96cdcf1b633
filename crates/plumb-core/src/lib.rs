#![forbid(unsafe_code)]
//! plumb-core: schemas, values, records, validation, and ordering.
//!
//! Everything here is pure data and synchronous. Higher crates build the
//! record builder, result sets, call stubs, and taps on top of these types.

pub mod compare;
pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod prelude;
pub mod schema;
pub mod types;
pub mod validate;

pub use error::{Error, Result};
