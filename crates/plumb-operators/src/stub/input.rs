//! Input assembly and cursors shared by the stubs.

use std::vec;

use plumb_core::error::{Error, Result};
use plumb_core::schema::{merge_cols, Col, Schema};
use plumb_core::types::{Entry, Group, Record};
use plumb_core::validate::validate_values;

use super::{CursorState, GroupState};

/// Records for an ungrouped stub, validated against an optional field mask.
#[derive(Debug, Clone)]
pub(crate) struct RecordInput {
    schema: Schema,
    mask: Vec<usize>,
    mask_schema: Schema,
    output: Option<Schema>,
    records: Vec<Entry>,
}

impl RecordInput {
    pub(crate) fn new(schema: Schema) -> Self {
        Self {
            mask: (0..schema.len()).collect(),
            mask_schema: schema.clone(),
            schema,
            output: None,
            records: Vec::new(),
        }
    }

    pub(crate) fn set_output(&mut self, schema: Schema) {
        self.output = Some(schema);
    }

    pub(crate) fn with_fields(&mut self, cols: &[Col]) -> Result<()> {
        let cols = merge_cols([cols]);
        let sub = self.schema.select(&cols)?;
        self.mask = self.schema.positions(&cols)?;
        self.mask_schema = sub;
        Ok(())
    }

    /// Empty `values` means all nulls; masked-out columns are always null.
    pub(crate) fn add_record(&mut self, values: Record) -> Result<()> {
        let values = validate_values(&self.mask_schema, Some(values))?;
        let mut full = Record::nulls(self.schema.len());
        full.assign(&self.mask, &values)?;
        self.records.push(Entry::new(self.schema.clone(), full)?);
        Ok(())
    }

    /// `(argument schema, declared output schema, records)`.
    pub(crate) fn finish(self) -> (Schema, Schema, Vec<Entry>) {
        let declared = self.output.unwrap_or_else(|| self.schema.clone());
        (self.schema, declared, self.records)
    }
}

/// Groups for a grouped stub, in insertion order.
#[derive(Debug, Clone)]
pub(crate) struct GroupedInput {
    group_schema: Schema,
    value_schema: Schema,
    output: Option<Schema>,
    groups: Vec<Group>,
    current: Option<usize>,
}

impl GroupedInput {
    pub(crate) fn new(group_schema: Schema, value_schema: Schema) -> Self {
        Self {
            group_schema,
            value_schema,
            output: None,
            groups: Vec::new(),
            current: None,
        }
    }

    pub(crate) fn set_output(&mut self, schema: Schema) {
        self.output = Some(schema);
    }

    /// Open the group for `values`. An existing key is re-opened, not duplicated.
    pub(crate) fn new_group(&mut self, values: Record) -> Result<()> {
        let key = validate_values(&self.group_schema, Some(values))?;
        let key = Entry::new(self.group_schema.clone(), key)?;
        let idx = match self.groups.iter().position(|g| g.key() == &key) {
            Some(idx) => idx,
            None => {
                self.groups.push(Group::new(key, Vec::new()));
                self.groups.len() - 1
            }
        };
        self.current = Some(idx);
        Ok(())
    }

    pub(crate) fn add_record(&mut self, values: Record) -> Result<()> {
        let group = self
            .current
            .and_then(|idx| self.groups.get_mut(idx))
            .ok_or_else(|| {
                Error::IllegalUse(format!(
                    "must start a group over {} before adding records",
                    self.group_schema
                ))
            })?;
        let values = validate_values(&self.value_schema, Some(values))?;
        group.push(Entry::new(self.value_schema.clone(), values)?);
        Ok(())
    }

    /// Split full-width records into group key and value by column name.
    pub(crate) fn add_grouped<I>(&mut self, full_schema: &Schema, records: I) -> Result<()>
    where
        I: IntoIterator<Item = Record>,
    {
        for record in records {
            let key = record.project(full_schema, &self.group_schema)?;
            let value = record.project(full_schema, &self.value_schema)?;
            self.new_group(key)?;
            self.add_record(value)?;
        }
        Ok(())
    }

    /// `(value schema, declared output schema, non-empty groups)`.
    pub(crate) fn finish(self) -> (Schema, Schema, Vec<Group>) {
        let declared = self.output.unwrap_or_else(|| self.value_schema.clone());
        let groups = self.groups.into_iter().filter(|g| !g.is_empty()).collect();
        (self.value_schema, declared, groups)
    }
}

#[derive(Debug)]
pub(crate) struct RecordCursor {
    input: vec::IntoIter<Entry>,
    current: Option<Entry>,
    state: CursorState,
}

impl RecordCursor {
    pub(crate) fn new(records: Vec<Entry>) -> Self {
        Self {
            input: records.into_iter(),
            current: None,
            state: CursorState::NotStarted,
        }
    }

    pub(crate) fn current(&self) -> Option<&Entry> {
        self.current.as_ref()
    }

    pub(crate) fn state(&self) -> CursorState {
        self.state
    }

    /// Step to the next record and return a copy of it.
    pub(crate) fn advance(&mut self) -> Option<Entry> {
        match self.input.next() {
            Some(entry) => {
                self.current = Some(entry.clone());
                self.state = CursorState::HasCurrent;
                Some(entry)
            }
            None => {
                self.state = CursorState::Exhausted;
                None
            }
        }
    }

    pub(crate) fn next(&mut self) -> Result<()> {
        self.advance()
            .map(|_| ())
            .ok_or_else(|| Error::Exhausted("no more argument records".to_string()))
    }
}

/// The values of one group, handed to a buffer as a single-pass sequence.
#[derive(Debug)]
pub struct GroupValues {
    inner: vec::IntoIter<Entry>,
}

impl GroupValues {
    pub(crate) fn new(values: Vec<Entry>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }

    /// Values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.inner.len()
    }
}

impl Default for GroupValues {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Iterator for GroupValues {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for GroupValues {}

#[derive(Debug)]
pub(crate) struct GroupCursor {
    groups: vec::IntoIter<Group>,
    group: Option<Entry>,
    values: GroupValues,
    current: Option<Entry>,
    state: GroupState,
}

impl GroupCursor {
    pub(crate) fn new(groups: Vec<Group>) -> Self {
        Self {
            groups: groups.into_iter(),
            group: None,
            values: GroupValues::default(),
            current: None,
            state: GroupState::BeforeFirstGroup,
        }
    }

    pub(crate) fn state(&self) -> GroupState {
        self.state
    }

    pub(crate) fn group(&self) -> Option<&Entry> {
        self.group.as_ref()
    }

    pub(crate) fn current(&self) -> Option<&Entry> {
        self.current.as_ref()
    }

    /// Step to the next group and return a copy of its key.
    pub(crate) fn advance_group(&mut self) -> Option<Entry> {
        match self.groups.next() {
            Some(group) => {
                let (key, values) = group.into_parts();
                self.group = Some(key.clone());
                self.values = GroupValues::new(values);
                self.current = None;
                self.state = GroupState::InGroup;
                Some(key)
            }
            None => {
                self.values = GroupValues::default();
                self.current = None;
                self.state = GroupState::AfterLastGroup;
                None
            }
        }
    }

    pub(crate) fn next_group(&mut self) -> Result<()> {
        self.advance_group()
            .map(|_| ())
            .ok_or_else(|| Error::Exhausted("no more groups".to_string()))
    }

    /// Step to the next value of the current group and return a copy of it.
    pub(crate) fn advance_value(&mut self) -> Option<Entry> {
        let value = self.values.next()?;
        self.current = Some(value.clone());
        Some(value)
    }

    pub(crate) fn next_value(&mut self) -> Result<()> {
        self.ensure_in_group()?;
        if self.advance_value().is_some() {
            return Ok(());
        }
        Err(Error::Exhausted(match &self.group {
            Some(key) => format!("no more values in group {}", key),
            None => "no more values".to_string(),
        }))
    }

    pub(crate) fn ensure_in_group(&self) -> Result<()> {
        match self.state {
            GroupState::InGroup => Ok(()),
            GroupState::BeforeFirstGroup => Err(Error::IllegalUse(
                "no current group; advance to a group first".to_string(),
            )),
            GroupState::AfterLastGroup => Err(Error::Exhausted("no more groups".to_string())),
        }
    }

    pub(crate) fn values_mut(&mut self) -> &mut GroupValues {
        &mut self.values
    }

    pub(crate) fn take_values(&mut self) -> GroupValues {
        std::mem::take(&mut self.values)
    }

    pub(crate) fn restore_values(&mut self, values: GroupValues) {
        self.values = values;
    }
}
