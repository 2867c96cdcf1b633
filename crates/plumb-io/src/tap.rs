//! Source and sink traits.
//!
//! A tap is a bounded, schema-described store of records. Reading yields
//! records one at a time; writing goes through a [`RecordWriter`] that must be
//! closed for the write to count.

use std::time::SystemTime;

use plumb_core::id::TapId;
use plumb_core::schema::Schema;
use plumb_core::types::Record;

use crate::error::Result;

/// Records read from a source, each possibly failing to decode.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<Record>> + 'a>;

pub trait Tap {
    fn id(&self) -> &TapId;
    fn schema(&self) -> &Schema;

    /// Last time the underlying data changed, when known.
    fn modified_time(&self) -> Option<SystemTime> {
        None
    }
}

pub trait Source: Tap {
    fn open_read(&self) -> Result<RecordIter<'_>>;
}

pub trait Sink: Tap {
    fn open_write(&mut self) -> Result<Box<dyn RecordWriter + '_>>;
}

pub trait RecordWriter {
    fn write(&mut self, record: &Record) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

/// Arity check every writer applies before accepting a record.
pub(crate) fn check_width(tap: &TapId, schema: &Schema, record: &Record) -> Result<()> {
    if record.len() != schema.len() {
        return Err(plumb_core::Error::Arity(format!(
            "{}: record {} has {} values but sink fields {} have {}",
            tap,
            record,
            record.len(),
            schema,
            schema.len()
        ))
        .into());
    }
    Ok(())
}
