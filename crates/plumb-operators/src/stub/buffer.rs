use std::marker::PhantomData;

use plumb_core::error::{Error, Result};
use plumb_core::schema::Schema;
use plumb_core::types::{Entry, Record};
use plumb_data::ResultSet;

use super::input::{GroupCursor, GroupValues, GroupedInput};
use super::{CallCore, GroupState};
use crate::trace;
use crate::traits::{Buffer, BufferCall, JoinerClosure, OpError};

const STUB: &str = "buffer";

/// Stands in for the engine when unit-testing a [`Buffer`].
///
/// Each group's values are handed over in one `operate` call as a
/// single-pass [`GroupValues`] sequence.
#[derive(Debug)]
pub struct BufferCallStub<C = ()> {
    core: CallCore<C>,
    cursor: GroupCursor,
    retain_values: bool,
}

impl_operation_call!(BufferCallStub);

impl<C> BufferCall<C> for BufferCallStub<C> {
    fn group(&self) -> Option<&Entry> {
        self.cursor.group()
    }

    fn set_retain_values(&mut self, retain: bool) {
        self.retain_values = retain;
    }

    fn is_retain_values(&self) -> bool {
        self.retain_values
    }

    fn joiner_closure(&self) -> Result<&dyn JoinerClosure> {
        Err(Error::Unsupported(
            "joiner closure: buffer joins over several inputs are not simulated".to_string(),
        ))
    }
}

impl<C> BufferCallStub<C> {
    pub fn builder(group_schema: Schema, non_group_schema: Schema) -> BufferCallStubBuilder<C> {
        BufferCallStubBuilder {
            input: GroupedInput::new(group_schema, non_group_schema),
            _context: PhantomData,
        }
    }

    pub fn state(&self) -> GroupState {
        self.cursor.state()
    }

    /// Advance to the next group; `Exhausted` when none is left.
    pub fn next_group(&mut self) -> Result<&mut Self> {
        self.cursor.next_group()?;
        Ok(self)
    }

    /// Remaining values of the current group.
    pub fn arguments_iter(&mut self) -> Result<&mut GroupValues> {
        self.cursor.ensure_in_group()?;
        Ok(self.cursor.values_mut())
    }

    /// Drive the remaining groups through `buffer`: `prepare`, one `operate`
    /// per group, then `flush`, `cleanup`.
    pub fn complete<B>(&mut self, buffer: &mut B) -> std::result::Result<&mut Self, OpError>
    where
        B: Buffer<C> + ?Sized,
    {
        if self.core.is_completed() {
            return Ok(self);
        }
        trace::call(STUB, "prepare");
        buffer.prepare(self)?;
        while self.cursor.advance_group().is_some() {
            let mut values = self.cursor.take_values();
            trace::call(STUB, "operate");
            let operated = buffer.operate(self, &mut values);
            self.cursor.restore_values(values);
            operated?;
        }
        trace::call(STUB, "flush");
        buffer.flush(self)?;
        trace::call(STUB, "cleanup");
        buffer.cleanup(self)?;
        self.core.finish(STUB);
        Ok(self)
    }

    pub fn run<B>(&mut self, buffer: &mut B) -> std::result::Result<ResultSet, OpError>
    where
        B: Buffer<C> + ?Sized,
    {
        self.complete(buffer)?;
        Ok(self.result())
    }
}

#[derive(Debug)]
pub struct BufferCallStubBuilder<C = ()> {
    input: GroupedInput,
    _context: PhantomData<fn() -> C>,
}

impl<C> BufferCallStubBuilder<C> {
    pub fn output_schema(mut self, schema: Schema) -> Self {
        self.input.set_output(schema);
        self
    }

    pub fn new_group(mut self, values: impl Into<Record>) -> Result<Self> {
        self.input.new_group(values.into())?;
        Ok(self)
    }

    pub fn add_record(mut self, values: impl Into<Record>) -> Result<Self> {
        self.input.add_record(values.into())?;
        Ok(self)
    }

    pub fn add_grouped<I>(mut self, full_schema: &Schema, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        self.input.add_grouped(full_schema, records)?;
        Ok(self)
    }

    pub fn build(self) -> BufferCallStub<C> {
        let (arguments, declared, groups) = self.input.finish();
        BufferCallStub {
            core: CallCore::new(arguments, declared),
            cursor: GroupCursor::new(groups),
            retain_values: false,
        }
    }
}
