//! In-memory taps: `ListTap` feeds records, `Bucket` captures them.

use std::time::SystemTime;

use plumb_core::error::Error as CoreError;
use plumb_core::id::TapId;
use plumb_core::schema::Schema;
use plumb_core::types::Record;
use plumb_data::ResultSet;

use crate::error::Result;
use crate::tap::{check_width, RecordIter, RecordWriter, Sink, Source, Tap};
use crate::trace;

/// Read-only source over a fixed list of records.
#[derive(Debug, Clone)]
pub struct ListTap {
    id: TapId,
    schema: Schema,
    records: Vec<Record>,
    created: SystemTime,
}

impl ListTap {
    pub fn new(schema: Schema, records: Vec<Record>) -> Result<Self> {
        let id = TapId::random("ListTap");
        for r in &records {
            check_width(&id, &schema, r)?;
        }
        Ok(Self {
            id,
            schema,
            records,
            created: SystemTime::now(),
        })
    }

    /// Source over the materialized view of `data` (sorted, projected).
    pub fn from_result(data: &ResultSet) -> Result<Self> {
        let schema = data.selected_schema()?;
        let records = data.as_record_list()?.to_vec();
        Self::new(schema, records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Tap for ListTap {
    fn id(&self) -> &TapId {
        &self.id
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn modified_time(&self) -> Option<SystemTime> {
        Some(self.created)
    }
}

impl Source for ListTap {
    fn open_read(&self) -> Result<RecordIter<'_>> {
        trace::open("read", self.id.as_str());
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}

impl Sink for ListTap {
    fn open_write(&mut self) -> Result<Box<dyn RecordWriter + '_>> {
        Err(CoreError::Unsupported(format!("cannot write to {}", self.id)).into())
    }
}

/// Write-only sink that keeps every record written to it.
#[derive(Debug, Clone)]
pub struct Bucket {
    id: TapId,
    schema: Schema,
    output: Vec<Record>,
    last_modified: SystemTime,
}

impl Bucket {
    pub fn new(schema: Schema) -> Self {
        Self {
            id: TapId::random("Bucket"),
            schema,
            output: Vec::new(),
            last_modified: SystemTime::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Everything captured so far.
    pub fn result(&self) -> Result<ResultSet> {
        Ok(ResultSet::new(self.schema.clone(), self.output.clone())?)
    }

    fn modified(&mut self) {
        self.last_modified = SystemTime::now();
    }
}

impl Tap for Bucket {
    fn id(&self) -> &TapId {
        &self.id
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn modified_time(&self) -> Option<SystemTime> {
        Some(self.last_modified)
    }
}

impl Source for Bucket {
    fn open_read(&self) -> Result<RecordIter<'_>> {
        Err(CoreError::Unsupported(format!("cannot read from {}", self.id)).into())
    }
}

impl Sink for Bucket {
    fn open_write(&mut self) -> Result<Box<dyn RecordWriter + '_>> {
        trace::open("write", self.id.as_str());
        Ok(Box::new(BucketWriter {
            bucket: self,
            written: 0,
        }))
    }
}

struct BucketWriter<'a> {
    bucket: &'a mut Bucket,
    written: usize,
}

impl RecordWriter for BucketWriter<'_> {
    fn write(&mut self, record: &Record) -> Result<()> {
        check_width(&self.bucket.id, &self.bucket.schema, record)?;
        self.bucket.output.push(record.clone());
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.bucket.modified();
        trace::transferred("write", self.bucket.id.as_str(), self.written);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use plumb_core::record;

    #[test]
    fn list_tap_reads_in_order() {
        let tap = ListTap::new(Schema::untyped(["A"]), vec![record![1], record![2]]).unwrap();
        let rows: Vec<Record> = tap.open_read().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(rows, vec![record![1], record![2]]);
        assert!(tap.id().as_str().starts_with("ListTap:"));
    }

    #[test]
    fn list_tap_rejects_ragged_records() {
        let err = ListTap::new(Schema::untyped(["A"]), vec![record![1, 2]]).unwrap_err();
        assert!(matches!(err, Error::Core(CoreError::Arity(_))));
    }

    #[test]
    fn list_tap_is_read_only() {
        let mut tap = ListTap::new(Schema::untyped(["A"]), vec![]).unwrap();
        assert!(matches!(
            tap.open_write(),
            Err(Error::Core(CoreError::Unsupported(_)))
        ));
    }

    #[test]
    fn bucket_captures_writes() {
        let mut bucket = Bucket::new(Schema::untyped(["A", "B"]));
        let before = bucket.modified_time();
        {
            let mut w = bucket.open_write().unwrap();
            w.write(&record![1, "x"]).unwrap();
            assert!(w.write(&record![1]).is_err());
            w.close().unwrap();
        }
        assert_eq!(bucket.result().unwrap().records(), &[record![1, "x"]]);
        assert!(bucket.modified_time() >= before);
        assert!(matches!(
            bucket.open_read(),
            Err(Error::Core(CoreError::Unsupported(_)))
        ));
    }
}
