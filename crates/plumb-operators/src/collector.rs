//! Captures what an operation emits.

use plumb_core::error::{Error, Result};
use plumb_core::schema::Schema;
use plumb_core::types::{Entry, Record};
use plumb_data::ResultSet;

/// Sink side of a call context. Every accepted record is stored as an owned
/// copy, in emission order.
#[derive(Debug, Clone)]
pub struct OutputCollector {
    schema: Schema,
    records: Vec<Record>,
}

impl OutputCollector {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Declared output schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a raw record; its width must match the declared schema.
    pub fn add(&mut self, record: &Record) -> Result<()> {
        if record.len() != self.schema.len() {
            return Err(Error::Arity(format!(
                "output record {} has {} values but declared fields {} have {}",
                record,
                record.len(),
                self.schema,
                self.schema.len()
            )));
        }
        self.records.push(record.clone());
        Ok(())
    }

    /// Append a column-aware entry; its columns must be exactly the declared ones.
    pub fn add_entry(&mut self, entry: &Entry) -> Result<()> {
        if !entry.schema().same_names(&self.schema) {
            return Err(Error::SchemaMismatch(format!(
                "entry fields {} do not match declared fields {}: {}",
                entry.schema(),
                self.schema,
                entry
            )));
        }
        self.records.push(entry.record().clone());
        Ok(())
    }

    /// Snapshot of the capture so far.
    pub fn result(&self) -> ResultSet {
        // widths are checked on add
        ResultSet::new(self.schema.clone(), self.records.clone())
            .unwrap_or_else(|_| ResultSet::empty(self.schema.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plumb_core::record;

    #[test]
    fn add_checks_arity() {
        let mut c = OutputCollector::new(Schema::untyped(["A", "B"]));
        c.add(&record![1, 2]).unwrap();
        let err = c.add(&record![1]).unwrap_err();
        assert!(matches!(err, Error::Arity(_)));
        assert!(err.to_string().contains("[A, B]"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn add_entry_needs_exact_columns() {
        let mut c = OutputCollector::new(Schema::untyped(["A", "B"]));
        let swapped = Entry::new(Schema::untyped(["B", "A"]), record![1, 2]).unwrap();
        assert!(matches!(c.add_entry(&swapped), Err(Error::SchemaMismatch(_))));
        let narrow = Entry::new(Schema::untyped(["A"]), record![1]).unwrap();
        assert!(matches!(c.add_entry(&narrow), Err(Error::SchemaMismatch(_))));
        let ok = Entry::new(Schema::untyped(["A", "B"]), record![1, 2]).unwrap();
        c.add_entry(&ok).unwrap();
        assert_eq!(c.result().records(), &[record![1, 2]]);
    }

    #[test]
    fn captured_records_are_copies() {
        let mut c = OutputCollector::new(Schema::untyped(["A"]));
        let mut r = record![1];
        c.add(&r).unwrap();
        r.set(0, 2).unwrap();
        c.add(&r).unwrap();
        assert_eq!(c.result().records(), &[record![1], record![2]]);
    }
}
