#![forbid(unsafe_code)]
//! plumb-data: building test input and inspecting captured output.
//!
//! - [`builder::RecordBuilder`] assembles record lists against a schema.
//! - [`result::ResultSet`] is the immutable, queryable view over records.
//! - [`pretty::PrettyPrinter`] renders a result set as a tab-delimited table.

pub mod builder;
pub mod pretty;
pub mod result;

pub use builder::RecordBuilder;
pub use pretty::PrettyPrinter;
pub use result::{ResultSet, Selection};
