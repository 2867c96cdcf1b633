//! Push a result set view into a sink.

use plumb_core::error::Error as CoreError;
use plumb_data::ResultSet;

use crate::error::Result;
use crate::tap::Sink;

pub struct TapWriter<'a> {
    data: &'a ResultSet,
}

impl<'a> TapWriter<'a> {
    pub fn new(data: &'a ResultSet) -> Self {
        Self { data }
    }

    /// Write the materialized view (sorted, projected) and close the writer.
    ///
    /// The selected width must equal the sink's schema width.
    pub fn to_sink<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let selected = self.data.selected_schema()?;
        if selected.len() != sink.schema().len() {
            return Err(CoreError::Arity(format!(
                "selected fields {} do not fit sink {} with fields {}",
                selected,
                sink.id(),
                sink.schema()
            ))
            .into());
        }
        let rows = self.data.as_record_list()?;
        let mut writer = sink.open_write()?;
        for row in rows.iter() {
            writer.write(row)?;
        }
        writer.close()
    }
}
