//! Pull every record of a source into a result set.

use plumb_data::ResultSet;

use crate::error::Result;
use crate::tap::Source;
use crate::trace;

pub struct TapReader<'a, S: Source + ?Sized> {
    source: &'a S,
}

impl<'a, S: Source + ?Sized> TapReader<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Records in source order, under the source's schema.
    pub fn read(&self) -> Result<ResultSet> {
        let records = self.source.open_read()?.collect::<Result<Vec<_>>>()?;
        trace::transferred("read", self.source.id().as_str(), records.len());
        Ok(ResultSet::new(self.source.schema().clone(), records)?)
    }
}
