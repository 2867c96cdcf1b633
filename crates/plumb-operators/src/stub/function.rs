use std::marker::PhantomData;

use plumb_core::error::Result;
use plumb_core::schema::{Col, Schema};
use plumb_core::types::{Entry, Record};
use plumb_data::ResultSet;

use super::input::{RecordCursor, RecordInput};
use super::{CallCore, CursorState};
use crate::trace;
use crate::traits::{Function, FunctionCall, OpError};

const STUB: &str = "function";

/// Stands in for the engine when unit-testing a [`Function`].
#[derive(Debug)]
pub struct FunctionCallStub<C = ()> {
    core: CallCore<C>,
    cursor: RecordCursor,
}

impl_operation_call!(FunctionCallStub);

impl<C> FunctionCall<C> for FunctionCallStub<C> {
    fn arguments(&self) -> Option<&Entry> {
        self.cursor.current()
    }
}

impl<C> FunctionCallStub<C> {
    pub fn builder(schema: Schema) -> FunctionCallStubBuilder<C> {
        FunctionCallStubBuilder {
            input: RecordInput::new(schema),
            _context: PhantomData,
        }
    }

    pub fn state(&self) -> CursorState {
        self.cursor.state()
    }

    /// Advance to the next argument record; `Exhausted` past the end.
    pub fn next_operate_call(&mut self) -> Result<&mut Self> {
        self.cursor.next()?;
        Ok(self)
    }

    /// Drive the remaining records through `function`:
    /// `prepare`, `operate` per record, `flush`, `cleanup`.
    pub fn complete<F>(&mut self, function: &mut F) -> std::result::Result<&mut Self, OpError>
    where
        F: Function<C> + ?Sized,
    {
        if self.core.is_completed() {
            return Ok(self);
        }
        trace::call(STUB, "prepare");
        function.prepare(self)?;
        while let Some(arguments) = self.cursor.advance() {
            trace::call(STUB, "operate");
            function.operate(self, &arguments)?;
        }
        trace::call(STUB, "flush");
        function.flush(self)?;
        trace::call(STUB, "cleanup");
        function.cleanup(self)?;
        self.core.finish(STUB);
        Ok(self)
    }

    /// [`complete`](Self::complete), then the frozen output.
    pub fn run<F>(&mut self, function: &mut F) -> std::result::Result<ResultSet, OpError>
    where
        F: Function<C> + ?Sized,
    {
        self.complete(function)?;
        Ok(self.result())
    }
}

#[derive(Debug)]
pub struct FunctionCallStubBuilder<C = ()> {
    input: RecordInput,
    _context: PhantomData<fn() -> C>,
}

impl<C> FunctionCallStubBuilder<C> {
    /// Declared output columns, when they differ from the argument columns.
    pub fn output_schema(mut self, schema: Schema) -> Self {
        self.input.set_output(schema);
        self
    }

    /// Restrict later `add_record` calls to `cols`; other columns stay null.
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

    pub fn build(self) -> FunctionCallStub<C> {
        let (arguments, declared, records) = self.input.finish();
        FunctionCallStub {
            core: CallCore::new(arguments, declared),
            cursor: RecordCursor::new(records),
        }
    }
}
