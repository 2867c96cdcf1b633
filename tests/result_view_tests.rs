//! Queries over captured output: ordering, projection, building.

use plumb::core::Error as CoreError;
use plumb::prelude::*;

fn abc() -> ResultSet {
    RecordBuilder::new(Schema::untyped(["A", "B", "C"]))
        .add_records([
            record![2, "b", 1.5],
            record![1, "a", Scalar::Null],
            record![2, "a", 0.5],
            record![Scalar::Null, "c", 2.5],
        ])
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn selecting_every_declared_field_is_the_identity() {
    let rs = abc();
    let all = rs.with_fields(&Schema::untyped(["A", "B", "C"]));
    assert_eq!(all.as_record_list().unwrap(), rs.as_record_list().unwrap());
    assert_eq!(
        rs.with_all_fields().as_record_list().unwrap().to_vec(),
        rs.records().to_vec()
    );
}

#[test]
fn equal_keys_keep_capture_order() {
    let rs = abc().order_by(["A"]).with_fields(Selection::only(["B"]));
    assert_eq!(
        rs.as_record_list().unwrap().to_vec(),
        vec![record!["c"], record!["a"], record!["b"], record!["a"]]
    );
}

#[test]
fn nulls_sort_first_in_both_directions() {
    let rs = abc();
    let asc = rs.order_by(["A"]).with_fields(Selection::only(["A"]));
    let desc = rs.order_by([SortKey::desc("A")]).with_fields(Selection::only(["A"]));
    assert_eq!(asc.as_record_list().unwrap()[0], record![Scalar::Null]);
    assert_eq!(
        desc.as_record_list().unwrap().to_vec(),
        vec![record![Scalar::Null], record![2], record![2], record![1]]
    );
}

#[test]
fn secondary_keys_break_ties() {
    let rs = abc()
        .order_by(keys(["A", "B"]))
        .with_fields(Selection::only(["A", "B"]));
    assert_eq!(
        rs.as_record_list().unwrap().to_vec(),
        vec![
            record![Scalar::Null, "c"],
            record![1, "a"],
            record![2, "a"],
            record![2, "b"],
        ]
    );
}

#[test]
fn views_do_not_change_the_capture() {
    let rs = abc();
    let view = rs.order_by([SortKey::desc("C")]).with_fields(Selection::only(["C"]));
    assert_eq!(rs, view);
    assert_eq!(rs.records()[0], record![2, "b", 1.5]);
    assert!(rs.sort_keys().is_empty());
}

#[test]
fn unknown_column_fails_on_materialize() {
    let view = abc().with_fields(Selection::only(["Z"]));
    assert!(matches!(
        view.as_record_list(),
        Err(CoreError::FieldResolution(_))
    ));
}

#[test]
fn builder_round_trip_with_nulls_and_masks() {
    let schema = Schema::new(vec![
        Field::new("ID", DataType::Int64, false),
        Field::untyped("NAME"),
        Field::new("SCORE", DataType::Float64, true),
    ]);
    let mut builder = RecordBuilder::new(schema);
    builder
        .add_record(record![1i64, "ann", 0.5])
        .unwrap()
        .with_fields(&cols(["NAME", "ID"]))
        .unwrap()
        .add_record(record!["bob", 2i64])
        .unwrap()
        .with_all_fields()
        .add_record_and_set([("ID", Scalar::from(3i64)), ("SCORE", Scalar::from(1.0))])
        .unwrap();
    let rs = builder.build().unwrap();
    assert_eq!(
        rs.records(),
        &[
            record![1i64, "ann", 0.5],
            record![2i64, "bob", Scalar::Null],
            record![3i64, Scalar::Null, 1.0],
        ]
    );
    assert_eq!(builder.build().unwrap(), rs);
}

#[test]
fn builder_coerces_to_declared_types() {
    let rs = RecordBuilder::with_types(
        Schema::untyped(["N", "S"]),
        vec![DataType::Int64, DataType::Utf8],
    )
    .unwrap()
    .add_record(record![7, "s"])
    .unwrap()
    .build()
    .unwrap();
    assert_eq!(rs.records(), &[record![7i64, "s"]]);
}

#[test]
fn selection_survives_serialization() {
    let selection = Selection::only(["B", "A"]);
    let json = serde_json::to_string(&selection).unwrap();
    let back: Selection = serde_json::from_str(&json).unwrap();
    assert_eq!(back, selection);
}

#[test]
fn pretty_output_has_header_and_tabs() {
    let rs = abc().with_fields(Selection::only(["A", "B"]));
    let text = rs.pretty().render().unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("A\tB"));
    assert_eq!(lines.next(), Some("2\tb"));
}
