#![forbid(unsafe_code)]
//! plumb: unit-test record operations without running a flow.
//!
//! Build input with a [`RecordBuilder`](data::RecordBuilder), hand it to a
//! call stub together with the operation under test, and inspect what the
//! operation emitted through the returned [`ResultSet`](data::ResultSet).
//!
//! ```
//! use plumb::prelude::*;
//!
//! struct Double;
//!
//! impl Function<()> for Double {
//!     fn operate(&mut self, call: &mut dyn FunctionCall<()>, args: &Entry) -> Result<(), OpError> {
//!         let v = args.get("A")?.as_i64().unwrap_or_default();
//!         call.output_collector().add(&record![v * 2])?;
//!         Ok(())
//!     }
//! }
//!
//! let mut stub = FunctionCallStub::<()>::builder(Schema::untyped(["A"]))
//!     .add_record(record![1i64]).unwrap()
//!     .add_record(record![2i64]).unwrap()
//!     .build();
//! let out = stub.run(&mut Double).unwrap();
//! assert_eq!(out.records(), &[record![2i64], record![4i64]]);
//! ```

pub use plumb_core as core;
pub use plumb_data as data;
pub use plumb_io as io;
pub use plumb_operators as operators;

pub mod prelude {
    //! Everything a typical operation test needs.
    //!
    //! The crates' `Result` aliases are not re-exported here.

    pub use plumb_core::prelude::{
        cols, keys, merge_cols, record, validate_values, Col, DataType, Direction, Entry, Field,
        Group, Hash256, PlumbConfig, Record, RecordComparator, Scalar, Schema, SortKey, TapId,
    };
    pub use plumb_data::{PrettyPrinter, RecordBuilder, ResultSet, Selection};
    pub use plumb_io::{Bucket, CsvTap, JsonlTap, ListTap, Sink, Source, Tap, TapReader, TapWriter};
    pub use plumb_operators::{
        Aggregator, AggregatorCall, AggregatorCallStub, Buffer, BufferCall, BufferCallStub,
        CursorState, Function, FunctionCall, FunctionCallStub, GroupState, GroupValues, OpError,
        OperationCall, OutputCollector, ValueAssertion, ValueAssertionCall,
        ValueAssertionCallStub,
    };
}
