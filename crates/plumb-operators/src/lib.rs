#![forbid(unsafe_code)]
//! plumb-operators: drive user operations through simulated engine calls.
//!
//! A call stub plays the role of the engine's per-call context. It owns the
//! input records (or groups), hands them to the operation in protocol order,
//! captures whatever the operation emits, and exposes the capture as a
//! [`ResultSet`](plumb_data::ResultSet).
//!
//! - Keep everything synchronous and single-threaded.
//! - Errors raised by the operation are returned unchanged.

pub mod collector;
pub mod stub;
pub mod traits;

mod trace;

pub use collector::OutputCollector;
pub use stub::{
    AggregatorCallStub, BufferCallStub, CursorState, FunctionCallStub, GroupState, GroupValues,
    ValueAssertionCallStub,
};
pub use traits::{
    Aggregator, AggregatorCall, Buffer, BufferCall, Function, FunctionCall, JoinerClosure,
    OpError, OperationCall, ValueAssertion, ValueAssertionCall,
};
