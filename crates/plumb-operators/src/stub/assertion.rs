use std::marker::PhantomData;

use plumb_core::error::Result;
use plumb_core::schema::{Col, Schema};
use plumb_core::types::{Entry, Record};
use plumb_data::ResultSet;

use super::input::{RecordCursor, RecordInput};
use super::{CallCore, CursorState};
use crate::trace;
use crate::traits::{OpError, ValueAssertion, ValueAssertionCall};

const STUB: &str = "value_assertion";

/// Stands in for the engine when unit-testing a [`ValueAssertion`].
///
/// An assertion that rejects a record stops the drive; the error reaches the
/// caller unchanged.
#[derive(Debug)]
pub struct ValueAssertionCallStub<C = ()> {
    core: CallCore<C>,
    cursor: RecordCursor,
}

impl_operation_call!(ValueAssertionCallStub);

impl<C> ValueAssertionCall<C> for ValueAssertionCallStub<C> {
    fn arguments(&self) -> Option<&Entry> {
        self.cursor.current()
    }
}

impl<C> ValueAssertionCallStub<C> {
    pub fn builder(schema: Schema) -> ValueAssertionCallStubBuilder<C> {
        ValueAssertionCallStubBuilder {
            input: RecordInput::new(schema),
            _context: PhantomData,
        }
    }

    pub fn state(&self) -> CursorState {
        self.cursor.state()
    }

    pub fn next_assertion_call(&mut self) -> Result<&mut Self> {
        self.cursor.next()?;
        Ok(self)
    }

    pub fn complete<A>(&mut self, assertion: &mut A) -> std::result::Result<&mut Self, OpError>
    where
        A: ValueAssertion<C> + ?Sized,
    {
        if self.core.is_completed() {
            return Ok(self);
        }
        trace::call(STUB, "prepare");
        assertion.prepare(self)?;
        while let Some(arguments) = self.cursor.advance() {
            trace::call(STUB, "assert");
            assertion.do_assert(self, &arguments)?;
        }
        trace::call(STUB, "flush");
        assertion.flush(self)?;
        trace::call(STUB, "cleanup");
        assertion.cleanup(self)?;
        self.core.finish(STUB);
        Ok(self)
    }

    pub fn run<A>(&mut self, assertion: &mut A) -> std::result::Result<ResultSet, OpError>
    where
        A: ValueAssertion<C> + ?Sized,
    {
        self.complete(assertion)?;
        Ok(self.result())
    }
}

#[derive(Debug)]
pub struct ValueAssertionCallStubBuilder<C = ()> {
    input: RecordInput,
    _context: PhantomData<fn() -> C>,
}

impl<C> ValueAssertionCallStubBuilder<C> {
    pub fn output_schema(mut self, schema: Schema) -> Self {
        self.input.set_output(schema);
        self
    }

    pub fn with_fields(mut self, cols: &[Col]) -> Result<Self> {
        self.input.with_fields(cols)?;
        Ok(self)
    }

    pub fn add_record(mut self, values: impl Into<Record>) -> Result<Self> {
        self.input.add_record(values.into())?;
        Ok(self)
    }

    pub fn add_records<I, R>(mut self, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        for r in records {
            self.input.add_record(r.into())?;
        }
        Ok(self)
    }

    pub fn build(self) -> ValueAssertionCallStub<C> {
        let (arguments, declared, records) = self.input.finish();
        ValueAssertionCallStub {
            core: CallCore::new(arguments, declared),
            cursor: RecordCursor::new(records),
        }
    }
}
