//! Operation capability traits and the call-context traits stubs implement.
//!
//! An operation receives the stub itself as its call context (`call`), plus
//! the entry being processed. Through the context it can read the current
//! group, keep an opaque per-run value of type `C`, and emit output.

use plumb_core::schema::Schema;
use plumb_core::types::Entry;

use crate::collector::OutputCollector;
use crate::stub::GroupValues;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    /// Harness error: bad arity, unknown column, exhausted cursor, ...
    #[error(transparent)]
    Core(#[from] plumb_core::Error),

    /// Raised by a value assertion that rejects its arguments.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// Any other failure raised by the operation under test.
    #[error("operation failed: {0}")]
    Failed(String),
}

/// Context shared by every call shape.
pub trait OperationCall<C> {
    fn context(&self) -> Option<&C>;
    fn context_mut(&mut self) -> Option<&mut C>;
    fn set_context(&mut self, context: C);
    fn take_context(&mut self) -> Option<C>;

    /// Schema of the records handed to the operation.
    fn argument_schema(&self) -> &Schema;

    /// Schema the operation declares for its output.
    fn declared_schema(&self) -> &Schema;

    fn output_collector(&mut self) -> &mut OutputCollector;
}

pub trait FunctionCall<C>: OperationCall<C> {
    fn arguments(&self) -> Option<&Entry>;
}

pub trait ValueAssertionCall<C>: OperationCall<C> {
    fn arguments(&self) -> Option<&Entry>;
}

pub trait AggregatorCall<C>: OperationCall<C> {
    fn group(&self) -> Option<&Entry>;
    fn arguments(&self) -> Option<&Entry>;
}

/// Values from several joined inputs, one position per input.
pub trait JoinerClosure {
    fn size(&self) -> usize;
    fn values(&self, pos: usize) -> Vec<Entry>;
}

pub trait BufferCall<C>: OperationCall<C> {
    fn group(&self) -> Option<&Entry>;
    fn set_retain_values(&mut self, retain: bool);
    fn is_retain_values(&self) -> bool;

    /// Multi-input buffer joins are not simulated; always `Unsupported`.
    fn joiner_closure(&self) -> plumb_core::Result<&dyn JoinerClosure>;
}

/// Per-record transform.
pub trait Function<C> {
    fn prepare(&mut self, _call: &mut dyn FunctionCall<C>) -> Result<(), OpError> {
        Ok(())
    }

    fn operate(&mut self, call: &mut dyn FunctionCall<C>, arguments: &Entry)
        -> Result<(), OpError>;

    fn flush(&mut self, _call: &mut dyn FunctionCall<C>) -> Result<(), OpError> {
        Ok(())
    }

    fn cleanup(&mut self, _call: &mut dyn FunctionCall<C>) -> Result<(), OpError> {
        Ok(())
    }
}

/// Per-record predicate. Rejections are reported as [`OpError::Assertion`].
pub trait ValueAssertion<C> {
    fn prepare(&mut self, _call: &mut dyn ValueAssertionCall<C>) -> Result<(), OpError> {
        Ok(())
    }

    fn do_assert(
        &mut self,
        call: &mut dyn ValueAssertionCall<C>,
        arguments: &Entry,
    ) -> Result<(), OpError>;

    fn flush(&mut self, _call: &mut dyn ValueAssertionCall<C>) -> Result<(), OpError> {
        Ok(())
    }

    fn cleanup(&mut self, _call: &mut dyn ValueAssertionCall<C>) -> Result<(), OpError> {
        Ok(())
    }
}

/// One-value-at-a-time grouped aggregation.
pub trait Aggregator<C> {
    fn prepare(&mut self, _call: &mut dyn AggregatorCall<C>) -> Result<(), OpError> {
        Ok(())
    }

    fn start(&mut self, call: &mut dyn AggregatorCall<C>, group: &Entry) -> Result<(), OpError>;

    fn aggregate(
        &mut self,
        call: &mut dyn AggregatorCall<C>,
        arguments: &Entry,
    ) -> Result<(), OpError>;

    fn complete(&mut self, call: &mut dyn AggregatorCall<C>, group: &Entry)
        -> Result<(), OpError>;

    fn flush(&mut self, _call: &mut dyn AggregatorCall<C>) -> Result<(), OpError> {
        Ok(())
    }

    fn cleanup(&mut self, _call: &mut dyn AggregatorCall<C>) -> Result<(), OpError> {
        Ok(())
    }
}

/// Whole-group processing: `operate` sees all values of a group in one call.
pub trait Buffer<C> {
    fn prepare(&mut self, _call: &mut dyn BufferCall<C>) -> Result<(), OpError> {
        Ok(())
    }

    fn operate(
        &mut self,
        call: &mut dyn BufferCall<C>,
        values: &mut GroupValues,
    ) -> Result<(), OpError>;

    fn flush(&mut self, _call: &mut dyn BufferCall<C>) -> Result<(), OpError> {
        Ok(())
    }

    fn cleanup(&mut self, _call: &mut dyn BufferCall<C>) -> Result<(), OpError> {
        Ok(())
    }
}
