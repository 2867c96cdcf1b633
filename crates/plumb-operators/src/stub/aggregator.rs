use std::marker::PhantomData;

use plumb_core::error::Result;
use plumb_core::schema::Schema;
use plumb_core::types::{Entry, Record};
use plumb_data::ResultSet;

use super::input::{GroupCursor, GroupedInput};
use super::{CallCore, GroupState};
use crate::trace;
use crate::traits::{Aggregator, AggregatorCall, OpError};

const STUB: &str = "aggregator";

/// Stands in for the engine when unit-testing an [`Aggregator`].
///
/// Groups are visited in insertion order, values within a group likewise.
#[derive(Debug)]
pub struct AggregatorCallStub<C = ()> {
    core: CallCore<C>,
    cursor: GroupCursor,
}

impl_operation_call!(AggregatorCallStub);

impl<C> AggregatorCall<C> for AggregatorCallStub<C> {
    fn group(&self) -> Option<&Entry> {
        self.cursor.group()
    }

    fn arguments(&self) -> Option<&Entry> {
        self.cursor.current()
    }
}

impl<C> AggregatorCallStub<C> {
    pub fn builder(group_schema: Schema, non_group_schema: Schema) -> AggregatorCallStubBuilder<C> {
        AggregatorCallStubBuilder {
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

    /// Advance to the next value of the current group; `Exhausted` at group end.
    pub fn next_aggregate_call(&mut self) -> Result<&mut Self> {
        self.cursor.next_value()?;
        Ok(self)
    }

    /// Drive the remaining groups through `aggregator`: `prepare`, then per
    /// group `start`, `aggregate` per value, `complete`; then `flush`, `cleanup`.
    pub fn complete<A>(&mut self, aggregator: &mut A) -> std::result::Result<&mut Self, OpError>
    where
        A: Aggregator<C> + ?Sized,
    {
        if self.core.is_completed() {
            return Ok(self);
        }
        trace::call(STUB, "prepare");
        aggregator.prepare(self)?;
        while let Some(group) = self.cursor.advance_group() {
            trace::call(STUB, "start");
            aggregator.start(self, &group)?;
            while let Some(arguments) = self.cursor.advance_value() {
                trace::call(STUB, "aggregate");
                aggregator.aggregate(self, &arguments)?;
            }
            trace::call(STUB, "complete");
            aggregator.complete(self, &group)?;
        }
        trace::call(STUB, "flush");
        aggregator.flush(self)?;
        trace::call(STUB, "cleanup");
        aggregator.cleanup(self)?;
        self.core.finish(STUB);
        Ok(self)
    }

    pub fn run<A>(&mut self, aggregator: &mut A) -> std::result::Result<ResultSet, OpError>
    where
        A: Aggregator<C> + ?Sized,
    {
        self.complete(aggregator)?;
        Ok(self.result())
    }
}

#[derive(Debug)]
pub struct AggregatorCallStubBuilder<C = ()> {
    input: GroupedInput,
    _context: PhantomData<fn() -> C>,
}

impl<C> AggregatorCallStubBuilder<C> {
    /// Declared output columns, when they differ from the non-group columns.
    pub fn output_schema(mut self, schema: Schema) -> Self {
        self.input.set_output(schema);
        self
    }

    /// Open a group keyed by `values` (empty means an all-null key).
    pub fn new_group(mut self, values: impl Into<Record>) -> Result<Self> {
        self.input.new_group(values.into())?;
        Ok(self)
    }

    /// Add a value record to the open group; `IllegalUse` before any group.
    pub fn add_record(mut self, values: impl Into<Record>) -> Result<Self> {
        self.input.add_record(values.into())?;
        Ok(self)
    }

    /// Add full-width records laid out as `full_schema`, split into key and value.
    pub fn add_grouped<I>(mut self, full_schema: &Schema, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        self.input.add_grouped(full_schema, records)?;
        Ok(self)
    }

    pub fn build(self) -> AggregatorCallStub<C> {
        let (arguments, declared, groups) = self.input.finish();
        AggregatorCallStub {
            core: CallCore::new(arguments, declared),
            cursor: GroupCursor::new(groups),
        }
    }
}
