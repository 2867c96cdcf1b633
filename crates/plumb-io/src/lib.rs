#![forbid(unsafe_code)]
//! plumb-io: bounded sources and sinks around result sets.
//!
//! - [`memory`]: `ListTap` (in-memory source) and `Bucket` (in-memory sink).
//! - [`csv`] and [`jsonl`]: file-backed taps.
//! - [`reader::TapReader`] pulls a source into a `ResultSet`;
//!   [`writer::TapWriter`] pushes a `ResultSet` view into a sink.

pub mod csv;
pub mod error;
pub mod jsonl;
pub mod memory;
pub mod reader;
pub mod tap;
pub mod writer;

mod trace;

pub use crate::csv::CsvTap;
pub use error::{Error, Result};
pub use jsonl::JsonlTap;
pub use memory::{Bucket, ListTap};
pub use reader::TapReader;
pub use tap::{RecordIter, RecordWriter, Sink, Source, Tap};
pub use writer::TapWriter;
