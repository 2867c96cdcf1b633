//! Driving operations through the call stubs end to end.

mod support;

use plumb::core::Error as CoreError;
use plumb::prelude::*;
use support::{typed_ab, CallLog, Identity};

#[test]
fn identity_function_sorted_and_projected() {
    let mut stub = FunctionCallStub::<()>::builder(typed_ab())
        .add_record(record![1, "x"])
        .unwrap()
        .add_record(record![2, "y"])
        .unwrap()
        .build();

    let out = stub.run(&mut Identity).unwrap();
    let view = out
        .order_by([SortKey::desc("A")])
        .with_fields(Selection::only(["B", "A"]));

    assert_eq!(
        view.as_record_list().unwrap().to_vec(),
        vec![record!["y", 2], record!["x", 1]]
    );
    assert_eq!(view.selected_schema().unwrap().names(), vec!["B", "A"]);
    assert_eq!(out.records(), &[record![1, "x"], record![2, "y"]]);
}

#[test]
fn completing_twice_returns_the_same_output() {
    struct Counting(usize);

    impl Function<()> for Counting {
        fn operate(&mut self, call: &mut dyn FunctionCall<()>, args: &Entry) -> Result<(), OpError> {
            self.0 += 1;
            call.output_collector().add(args.record())?;
            Ok(())
        }
    }

    let mut stub = FunctionCallStub::<()>::builder(Schema::untyped(["A"]))
        .add_records([record![1], record![2], record![3]])
        .unwrap()
        .build();
    let mut op = Counting(0);
    let first = stub.run(&mut op).unwrap();
    let second = stub.run(&mut op).unwrap();
    assert_eq!(op.0, 3);
    assert_eq!(first, second);
    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
}

#[test]
fn non_nullable_typed_column_rejects_null_and_mistyped_values() {
    let schema = Schema::new(vec![Field::new("N", DataType::Int64, false)]);

    let null = FunctionCallStub::<()>::builder(schema.clone())
        .add_record(record![Scalar::Null])
        .unwrap_err();
    assert!(matches!(null, CoreError::TypeMismatch(_)));

    let narrow = FunctionCallStub::<()>::builder(schema.clone())
        .add_record(record![1i32])
        .unwrap_err();
    assert!(matches!(narrow, CoreError::TypeMismatch(_)));

    let ok = FunctionCallStub::<()>::builder(schema)
        .add_record(record![1i64])
        .unwrap()
        .build();
    assert_eq!(ok.state(), CursorState::NotStarted);
}

#[test]
fn wrong_width_is_an_arity_error() {
    let err = FunctionCallStub::<()>::builder(Schema::untyped(["A", "B"]))
        .add_record(record![1])
        .unwrap_err();
    assert!(matches!(err, CoreError::Arity(_)));
}

#[test]
fn aggregator_sees_protocol_order_then_exhausts() {
    let mut stub = AggregatorCallStub::<()>::builder(Schema::untyped(["K"]), Schema::untyped(["V"]))
        .output_schema(Schema::untyped(["K"]))
        .new_group(record!["a"])
        .unwrap()
        .add_record(record![1])
        .unwrap()
        .add_record(record![2])
        .unwrap()
        .new_group(record!["empty"])
        .unwrap()
        .new_group(record!["b"])
        .unwrap()
        .add_record(record![3])
        .unwrap()
        .build();

    let mut log = CallLog::default();
    let out = stub.run(&mut log).unwrap();
    assert_eq!(
        log.calls,
        vec![
            "prepare",
            "start a",
            "aggregate 1",
            "aggregate 2",
            "complete a",
            "start b",
            "aggregate 3",
            "complete b",
            "flush",
            "cleanup",
        ]
    );
    assert_eq!(out.records(), &[record!["a"], record!["b"]]);
    assert_eq!(stub.state(), GroupState::AfterLastGroup);
    assert!(matches!(stub.next_group(), Err(CoreError::Exhausted(_))));
    assert!(matches!(stub.next_aggregate_call(), Err(CoreError::Exhausted(_))));
}

#[test]
fn reopened_group_collects_more_values() {
    let mut stub = AggregatorCallStub::<()>::builder(Schema::untyped(["K"]), Schema::untyped(["V"]))
        .output_schema(Schema::untyped(["K"]))
        .new_group(record!["a"])
        .unwrap()
        .add_record(record![1])
        .unwrap()
        .new_group(record!["b"])
        .unwrap()
        .add_record(record![2])
        .unwrap()
        .new_group(record!["a"])
        .unwrap()
        .add_record(record![3])
        .unwrap()
        .build();

    let mut log = CallLog::default();
    stub.complete(&mut log).unwrap();
    assert_eq!(
        &log.calls[1..5],
        ["start a", "aggregate 1", "aggregate 3", "complete a"]
    );
}

#[test]
fn value_assertion_failure_is_returned_unchanged() {
    struct Positive;

    impl ValueAssertion<()> for Positive {
        fn do_assert(
            &mut self,
            _call: &mut dyn ValueAssertionCall<()>,
            args: &Entry,
        ) -> Result<(), OpError> {
            match args.get("A")?.as_i64() {
                Some(v) if v > 0 => Ok(()),
                _ => Err(OpError::Assertion(format!("not positive: {}", args))),
            }
        }
    }

    let mut passing = ValueAssertionCallStub::<()>::builder(Schema::untyped(["A"]))
        .add_records([record![1], record![2]])
        .unwrap()
        .build();
    assert!(passing.run(&mut Positive).unwrap().is_empty());

    let mut failing = ValueAssertionCallStub::<()>::builder(Schema::untyped(["A"]))
        .add_records([record![1], record![-1]])
        .unwrap()
        .build();
    let err = failing.complete(&mut Positive).unwrap_err();
    assert!(matches!(err, OpError::Assertion(_)));
    assert!(!failing.is_completed());
}

#[test]
fn buffer_receives_each_group_in_bulk() {
    struct Totals;

    impl Buffer<()> for Totals {
        fn operate(
            &mut self,
            call: &mut dyn BufferCall<()>,
            values: &mut GroupValues,
        ) -> Result<(), OpError> {
            let key = match call.group() {
                Some(g) => g.get("K")?.clone(),
                None => Scalar::Null,
            };
            let total: i64 = values.filter_map(|v| v.record()[0].as_i64()).sum();
            call.output_collector().add(&record![key, total])?;
            Ok(())
        }
    }

    let full = Schema::untyped(["K", "V"]);
    let mut stub = BufferCallStub::<()>::builder(Schema::untyped(["K"]), Schema::untyped(["V"]))
        .output_schema(Schema::untyped(["K", "TOTAL"]))
        .add_grouped(
            &full,
            [record!["a", 1i64], record!["b", 5i64], record!["a", 2i64]],
        )
        .unwrap()
        .build();

    let out = stub.run(&mut Totals).unwrap();
    assert_eq!(out.records(), &[record!["a", 3i64], record!["b", 5i64]]);
    assert!(matches!(stub.joiner_closure(), Err(CoreError::Unsupported(_))));
}
