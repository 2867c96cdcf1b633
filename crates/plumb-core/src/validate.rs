//! Value validation and coercion against a schema.
//!
//! `validate_values` rejects a null or a mistyped value for a primitive-like
//! field (typed, non-nullable) instead of converting it.
//!
//! `coerce_record` is the lenient, engine-style conversion the record builder
//! applies when it finalizes a record against explicit target types.

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};
use crate::types::{Record, Scalar};

/// Validate candidate values for `schema`.
///
/// Absent or empty values yield an all-null record sized to the schema.
pub fn validate_values(schema: &Schema, values: Option<Record>) -> Result<Record> {
    let values = match values {
        None => return Ok(Record::nulls(schema.len())),
        Some(v) if v.is_empty() => return Ok(Record::nulls(schema.len())),
        Some(v) => v,
    };
    if values.len() != schema.len() {
        return Err(Error::Arity(format!(
            "value array length {} not suitable for fields {}: {}",
            values.len(),
            schema,
            values
        )));
    }

    for (field, value) in schema.fields.iter().zip(values.iter()) {
        check_primitive(field, value)?;
    }
    Ok(values)
}

fn check_primitive(field: &Field, value: &Scalar) -> Result<()> {
    let Some(expected) = field.data_type else {
        return Ok(());
    };
    if field.nullable {
        return Ok(());
    }
    match value.data_type() {
        None => Err(Error::TypeMismatch(format!(
            "null cannot be converted to {} for non-nullable field '{}'",
            expected, field.name
        ))),
        Some(actual) if actual != expected => Err(Error::TypeMismatch(format!(
            "{} value {} cannot be converted to {} for field '{}'",
            actual, value, expected, field.name
        ))),
        Some(_) => Ok(()),
    }
}

/// Coerce every value of `record` to the matching entry of `types`.
///
/// `None` types leave the value untouched. Nullability comes from `schema`.
pub fn coerce_record(
    schema: &Schema,
    types: &[Option<DataType>],
    record: &Record,
) -> Result<Record> {
    if types.len() != record.len() || schema.len() != record.len() {
        return Err(Error::Arity(format!(
            "cannot coerce record {} of width {} with {} types against schema {}",
            record,
            record.len(),
            types.len(),
            schema
        )));
    }
    schema
        .fields
        .iter()
        .zip(types.iter())
        .zip(record.iter())
        .map(|((field, ty), value)| match ty {
            None => Ok(value.clone()),
            Some(t) => coerce(value, *t, field.nullable).map_err(|e| match e {
                Error::TypeMismatch(msg) => {
                    Error::TypeMismatch(format!("field '{}': {}", field.name, msg))
                }
                other => other,
            }),
        })
        .collect()
}

/// Convert one value to `target`. Null becomes the zero value unless `nullable`.
pub fn coerce(value: &Scalar, target: DataType, nullable: bool) -> Result<Scalar> {
    use Scalar::*;

    if value.is_null() {
        return Ok(if nullable { Null } else { zero_value(target) });
    }
    if value.data_type() == Some(target) {
        return Ok(value.clone());
    }

    let fail = || {
        Error::TypeMismatch(format!(
            "cannot coerce {:?} to {}",
            value, target
        ))
    };

    let out = match target {
        DataType::Boolean => match value {
            Str(s) => Bool(s.trim().parse::<bool>().map_err(|_| fail())?),
            _ => return Err(fail()),
        },
        DataType::Int32 => match value {
            I64(v) => I32(i32::try_from(*v).map_err(|_| fail())?),
            F32(v) => I32(*v as i32),
            F64(v) => I32(*v as i32),
            Str(s) => I32(s.trim().parse::<i32>().map_err(|_| fail())?),
            _ => return Err(fail()),
        },
        DataType::Int64 => match value {
            I32(v) => I64(*v as i64),
            F32(v) => I64(*v as i64),
            F64(v) => I64(*v as i64),
            Str(s) => I64(s.trim().parse::<i64>().map_err(|_| fail())?),
            _ => return Err(fail()),
        },
        DataType::Float32 => match value {
            I32(v) => F32(*v as f32),
            I64(v) => F32(*v as f32),
            F64(v) => F32(*v as f32),
            Str(s) => F32(s.trim().parse::<f32>().map_err(|_| fail())?),
            _ => return Err(fail()),
        },
        DataType::Float64 => match value {
            I32(v) => F64(*v as f64),
            I64(v) => F64(*v as f64),
            F32(v) => F64(*v as f64),
            Str(s) => F64(s.trim().parse::<f64>().map_err(|_| fail())?),
            _ => return Err(fail()),
        },
        DataType::Utf8 => match value {
            Bin(_) => return Err(fail()),
            other => Str(other.to_string()),
        },
        DataType::Binary => match value {
            Str(s) => Bin(s.as_bytes().to_vec()),
            _ => return Err(fail()),
        },
    };
    Ok(out)
}

fn zero_value(t: DataType) -> Scalar {
    match t {
        DataType::Boolean => Scalar::Bool(false),
        DataType::Int32 => Scalar::I32(0),
        DataType::Int64 => Scalar::I64(0),
        DataType::Float32 => Scalar::F32(0.0),
        DataType::Float64 => Scalar::F64(0.0),
        DataType::Utf8 => Scalar::Null,
        DataType::Binary => Scalar::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    fn one(field: Field) -> Schema {
        Schema::new(vec![field])
    }

    #[test]
    fn absent_or_empty_values_become_nulls() {
        let s = one(Field::new("foo", DataType::Utf8, true));
        assert_eq!(validate_values(&s, None).unwrap(), Record::nulls(1));
        assert_eq!(validate_values(&s, Some(record![])).unwrap(), Record::nulls(1));
    }

    #[test]
    fn wrong_length_fails() {
        let s = one(Field::new("foo", DataType::Utf8, true));
        assert!(matches!(
            validate_values(&s, Some(record!["first", "second"])),
            Err(Error::Arity(_))
        ));
    }

    #[test]
    fn nullable_and_untyped_fields_are_not_checked() {
        let s = one(Field::new("foo", DataType::Utf8, true));
        assert_eq!(
            validate_values(&s, Some(record![1])).unwrap(),
            record![1]
        );
        let s = one(Field::untyped("foo"));
        assert_eq!(
            validate_values(&s, Some(record!["someValue"])).unwrap(),
            record!["someValue"]
        );
    }

    #[test]
    fn null_for_primitive_fails() {
        let s = one(Field::new("foo", DataType::Boolean, false));
        let err = validate_values(&s, Some(record![Scalar::Null])).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch(_)));
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn wrong_primitive_type_fails() {
        let s = one(Field::new("foo", DataType::Boolean, false));
        assert!(matches!(
            validate_values(&s, Some(record![4])),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            validate_values(&s, Some(record!["someValue"])),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn no_numeric_widening_or_narrowing() {
        let long = one(Field::new("foo", DataType::Int64, false));
        assert!(matches!(
            validate_values(&long, Some(record![4i32])),
            Err(Error::TypeMismatch(_))
        ));
        let int = one(Field::new("foo", DataType::Int32, false));
        assert!(matches!(
            validate_values(&int, Some(record![4i64])),
            Err(Error::TypeMismatch(_))
        ));
        assert_eq!(
            validate_values(&int, Some(record![4i32])).unwrap(),
            record![4i32]
        );
    }

    #[test]
    fn coercion_is_lenient() {
        assert_eq!(
            coerce(&Scalar::from("42"), DataType::Int64, false).unwrap(),
            Scalar::I64(42)
        );
        assert_eq!(
            coerce(&Scalar::Null, DataType::Boolean, false).unwrap(),
            Scalar::Bool(false)
        );
        assert_eq!(
            coerce(&Scalar::Null, DataType::Int32, true).unwrap(),
            Scalar::Null
        );
        assert_eq!(
            coerce(&Scalar::I32(7), DataType::Utf8, true).unwrap(),
            Scalar::from("7")
        );
        assert!(matches!(
            coerce(&Scalar::from("x"), DataType::Int32, false),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn coerce_record_uses_schema_nullability() {
        let schema = Schema::new(vec![
            Field::new("A", DataType::Int32, false),
            Field::untyped("B"),
        ]);
        let out = coerce_record(
            &schema,
            &[Some(DataType::Int32), Some(DataType::Int64)],
            &record![Scalar::Null, "9"],
        )
        .unwrap();
        assert_eq!(out, record![0, 9i64]);
    }
}
