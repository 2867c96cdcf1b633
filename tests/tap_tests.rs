//! Moving result sets through sources and sinks.

mod support;

use std::fs;

use plumb::io::Error as IoError;
use plumb::prelude::*;
use support::{temp_path, typed_ab, Identity};

fn captured() -> ResultSet {
    let mut stub = FunctionCallStub::<()>::builder(typed_ab())
        .add_records([record![2, "y"], record![1, Scalar::Null], record![3, "x"]])
        .unwrap()
        .build();
    stub.run(&mut Identity).unwrap()
}

#[test]
fn bucket_receives_the_sorted_view() {
    let out = captured().order_by(["A"]);
    let mut bucket = Bucket::new(typed_ab());
    TapWriter::new(&out).to_sink(&mut bucket).unwrap();
    assert_eq!(
        bucket.result().unwrap().records(),
        &[record![1, Scalar::Null], record![2, "y"], record![3, "x"]]
    );
}

#[test]
fn list_tap_feeds_a_stub() {
    let tap = ListTap::from_result(&captured().with_fields(Selection::only(["A"]))).unwrap();
    let input = TapReader::new(&tap).read().unwrap();

    let mut stub = FunctionCallStub::<()>::builder(input.schema().clone())
        .add_records(input.records().iter().cloned())
        .unwrap()
        .build();
    let out = stub.run(&mut Identity).unwrap();
    assert_eq!(out.records(), &[record![2], record![1], record![3]]);
}

#[test]
fn csv_round_trip_keeps_types_and_nulls() {
    let path = temp_path("round-trip.csv");
    let original = captured();
    let mut tap = CsvTap::new(typed_ab(), &path);
    TapWriter::new(&original).to_sink(&mut tap).unwrap();

    let back = TapReader::new(&tap).read().unwrap();
    assert_eq!(back, original);
    assert!(tap.modified_time().is_some());
    let _ = fs::remove_file(&path);
}

#[test]
fn jsonl_round_trip_of_a_projection() {
    let path = temp_path("projection.jsonl");
    let view = captured()
        .order_by([SortKey::desc("A")])
        .with_fields(Selection::only(["B", "A"]));
    let schema = view.selected_schema().unwrap();
    let mut tap = JsonlTap::new(schema, &path);
    TapWriter::new(&view).to_sink(&mut tap).unwrap();

    let back = TapReader::new(&tap).read().unwrap();
    assert_eq!(
        back.records(),
        &[record!["x", 3], record!["y", 2], record![Scalar::Null, 1]]
    );
    let _ = fs::remove_file(&path);
}

#[test]
fn narrow_sink_is_rejected_before_writing() {
    let mut bucket = Bucket::new(Schema::untyped(["A"]));
    let err = TapWriter::new(&captured()).to_sink(&mut bucket).unwrap_err();
    assert!(matches!(err, IoError::Core(plumb::core::Error::Arity(_))));
    assert!(bucket.is_empty());
}
