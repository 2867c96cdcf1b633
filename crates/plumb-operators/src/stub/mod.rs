//! Call stubs: one shared core plus a small driver per call shape.
//!
//! | stub                       | input            | operation          |
//! |----------------------------|------------------|--------------------|
//! | [`FunctionCallStub`]       | records          | [`Function`]       |
//! | [`ValueAssertionCallStub`] | records          | [`ValueAssertion`] |
//! | [`AggregatorCallStub`]     | groups, by value | [`Aggregator`]     |
//! | [`BufferCallStub`]         | groups, in bulk  | [`Buffer`]         |
//!
//! `complete(op)` drives the remaining input through the operation's
//! lifecycle. The first drive that succeeds freezes the output; later calls
//! return without touching the operation.
//!
//! [`Function`]: crate::traits::Function
//! [`ValueAssertion`]: crate::traits::ValueAssertion
//! [`Aggregator`]: crate::traits::Aggregator
//! [`Buffer`]: crate::traits::Buffer

use plumb_core::schema::Schema;
use plumb_data::ResultSet;

use crate::collector::OutputCollector;
use crate::trace;

/// Implements [`OperationCall`](crate::traits::OperationCall) and the common
/// inherent accessors for a stub holding a `core: CallCore<C>` field.
macro_rules! impl_operation_call {
    ($stub:ident) => {
        impl<C> $crate::traits::OperationCall<C> for $stub<C> {
            fn context(&self) -> Option<&C> {
                self.core.context.as_ref()
            }

            fn context_mut(&mut self) -> Option<&mut C> {
                self.core.context.as_mut()
            }

            fn set_context(&mut self, context: C) {
                self.core.context = Some(context);
            }

            fn take_context(&mut self) -> Option<C> {
                self.core.context.take()
            }

            fn argument_schema(&self) -> &plumb_core::schema::Schema {
                &self.core.argument_schema
            }

            fn declared_schema(&self) -> &plumb_core::schema::Schema {
                self.core.collector.schema()
            }

            fn output_collector(&mut self) -> &mut $crate::collector::OutputCollector {
                &mut self.core.collector
            }
        }

        impl<C> $stub<C> {
            /// Frozen output once completed, otherwise a snapshot of the capture so far.
            pub fn result(&self) -> plumb_data::ResultSet {
                self.core.result()
            }

            pub fn is_completed(&self) -> bool {
                self.core.is_completed()
            }
        }
    };
}

mod aggregator;
mod assertion;
mod buffer;
mod function;
mod input;

pub use aggregator::{AggregatorCallStub, AggregatorCallStubBuilder};
pub use assertion::{ValueAssertionCallStub, ValueAssertionCallStubBuilder};
pub use buffer::{BufferCallStub, BufferCallStubBuilder};
pub use function::{FunctionCallStub, FunctionCallStubBuilder};
pub use input::GroupValues;

/// Cursor state of an ungrouped stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    NotStarted,
    HasCurrent,
    Exhausted,
}

/// Cursor state of a grouped stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    BeforeFirstGroup,
    InGroup,
    AfterLastGroup,
}

/// State every stub shares: the opaque context, the schemas, the collector,
/// and the run-once guard (`outcome`).
#[derive(Debug)]
pub(crate) struct CallCore<C> {
    pub(crate) context: Option<C>,
    pub(crate) argument_schema: Schema,
    pub(crate) collector: OutputCollector,
    outcome: Option<ResultSet>,
}

impl<C> CallCore<C> {
    pub(crate) fn new(argument_schema: Schema, declared_schema: Schema) -> Self {
        Self {
            context: None,
            argument_schema,
            collector: OutputCollector::new(declared_schema),
            outcome: None,
        }
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }

    /// Set the guard and freeze the capture. Never reset.
    pub(crate) fn finish(&mut self, stub: &'static str) {
        let frozen = self.collector.result();
        trace::completed(stub, frozen.len());
        self.outcome = Some(frozen);
    }

    pub(crate) fn result(&self) -> ResultSet {
        match &self.outcome {
            Some(frozen) => frozen.clone(),
            None => self.collector.result(),
        }
    }
}
