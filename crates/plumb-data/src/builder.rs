//! Fluent construction of record lists against a fixed schema.
//!
//! The builder keeps at most one in-progress record. Starting a new record,
//! copying, or building finalizes the in-progress one: it is coerced to the
//! builder's target types and appended. Values written through `set_record`
//! and `add_record` land in the positions of the active field mask.

use plumb_core::error::{Error, Result};
use plumb_core::schema::{merge_cols, Col, DataType, Schema};
use plumb_core::types::{Entry, Record, Scalar};
use plumb_core::validate::coerce_record;

use crate::result::ResultSet;

#[derive(Debug, Clone)]
pub struct RecordBuilder {
    schema: Schema,
    types: Option<Vec<Option<DataType>>>,
    records: Vec<Record>,
    current: Option<Record>,
    mask: Vec<usize>,
}

impl RecordBuilder {
    /// Builder whose coercion targets are the schema's typed fields.
    pub fn new(schema: Schema) -> Self {
        let types: Vec<Option<DataType>> = schema.fields.iter().map(|f| f.data_type).collect();
        let types = types.iter().any(Option::is_some).then_some(types);
        let mask = (0..schema.len()).collect();
        Self {
            schema,
            types,
            records: Vec::new(),
            current: None,
            mask,
        }
    }

    /// Builder with explicit target types, one per schema column.
    pub fn with_types(schema: Schema, types: Vec<DataType>) -> Result<Self> {
        if types.len() != schema.len() {
            return Err(Error::Arity(format!(
                "{} types supplied for schema {} of {} columns",
                types.len(),
                schema,
                schema.len()
            )));
        }
        let mut b = Self::new(schema);
        b.types = Some(types.into_iter().map(Some).collect());
        Ok(b)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of finalized records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.current.is_none()
    }

    fn finalize(&mut self) -> Result<()> {
        let Some(current) = self.current.as_ref() else {
            return Ok(());
        };
        // The record stays in progress until it coerces cleanly.
        let record = match &self.types {
            Some(types) => coerce_record(&self.schema, types, current)?,
            None => current.clone(),
        };
        self.current = None;
        self.records.push(record);
        Ok(())
    }

    fn current_mut(&mut self) -> Result<&mut Record> {
        self.current.as_mut().ok_or_else(|| {
            Error::IllegalUse("no record in progress; call new_record() first".to_string())
        })
    }

    /// Finalize any in-progress record and start an all-null one.
    pub fn new_record(&mut self) -> Result<&mut Self> {
        self.finalize()?;
        self.current = Some(Record::nulls(self.schema.len()));
        Ok(self)
    }

    pub fn set(&mut self, col: impl Into<Col>, value: impl Into<Scalar>) -> Result<&mut Self> {
        let col = col.into();
        self.current_mut()?;
        let idx = self.schema.resolve(&col)?;
        self.current_mut()?.set(idx, value)?;
        Ok(self)
    }

    /// Write several named values into the in-progress record.
    pub fn set_map<I, K, V>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Col>,
        V: Into<Scalar>,
    {
        self.current_mut()?;
        for (k, v) in values {
            self.set(k, v)?;
        }
        Ok(self)
    }

    /// Write values for the active field mask into the in-progress record.
    pub fn set_record(&mut self, values: impl Into<Record>) -> Result<&mut Self> {
        let values = values.into();
        self.check_mask_width(&values)?;
        let mask = self.mask.clone();
        self.current_mut()?.assign(&mask, &values)?;
        Ok(self)
    }

    fn check_mask_width(&self, values: &Record) -> Result<()> {
        if values.len() != self.mask.len() {
            return Err(Error::Arity(format!(
                "{} values supplied for {} selected fields of {}: {}",
                values.len(),
                self.mask.len(),
                self.schema,
                values
            )));
        }
        Ok(())
    }

    /// Restrict later `set_record`/`add_record` calls to `cols`, in that order.
    pub fn with_fields(&mut self, cols: &[Col]) -> Result<&mut Self> {
        let cols = merge_cols([cols]);
        self.schema.select(&cols)?;
        self.mask = self.schema.positions(&cols)?;
        Ok(self)
    }

    pub fn with_all_fields(&mut self) -> &mut Self {
        self.mask = (0..self.schema.len()).collect();
        self
    }

    /// Finalize the in-progress record and start an identical one.
    pub fn copy_record(&mut self) -> Result<&mut Self> {
        let copy = self
            .current
            .clone()
            .ok_or_else(|| Error::IllegalUse("no record in progress to copy".to_string()))?;
        self.finalize()?;
        self.current = Some(copy);
        Ok(self)
    }

    /// Start a new record holding `values` in the masked positions.
    pub fn add_record(&mut self, values: impl Into<Record>) -> Result<&mut Self> {
        let values = values.into();
        self.check_mask_width(&values)?;
        self.new_record()?;
        self.set_record(values)
    }

    pub fn add_records<I, R>(&mut self, records: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        for r in records {
            self.add_record(r)?;
        }
        Ok(self)
    }

    pub fn add_entry(&mut self, entry: &Entry) -> Result<&mut Self> {
        self.add_record(entry.record().clone())
    }

    pub fn add_entries<'a, I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        for e in entries {
            self.add_entry(e)?;
        }
        Ok(self)
    }

    /// Start a new record and set the named values on it.
    pub fn add_record_and_set<I, K, V>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Col>,
        V: Into<Scalar>,
    {
        self.new_record()?;
        self.set_map(values)
    }

    /// Append every captured record of `source` (capture order, full width).
    pub fn copy_records_from(&mut self, source: &ResultSet) -> Result<&mut Self> {
        if source.schema().len() != self.schema.len() {
            return Err(Error::Arity(format!(
                "cannot copy records of {} into builder for {}",
                source.schema(),
                self.schema
            )));
        }
        for r in source.records() {
            self.finalize()?;
            self.current = Some(r.clone());
        }
        Ok(self)
    }

    /// Finalize and freeze everything built so far.
    ///
    /// The builder keeps its records; building twice yields equal result sets.
    pub fn build(&mut self) -> Result<ResultSet> {
        self.finalize()?;
        ResultSet::new(self.schema.clone(), self.records.clone())
    }
}
