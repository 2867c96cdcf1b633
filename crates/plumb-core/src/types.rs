//! Values, records, and column-aware entries.
//!
//! Records are value-like: equality and hashing are structural, floats
//! compare by bit pattern so a record always equals its own copy.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{Col, DataType, Schema};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
}

impl Scalar {
    /// Declared type this value carries; `None` for null.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(_) => Some(DataType::Boolean),
            Scalar::I32(_) => Some(DataType::Int32),
            Scalar::I64(_) => Some(DataType::Int64),
            Scalar::F32(_) => Some(DataType::Float32),
            Scalar::F64(_) => Some(DataType::Float64),
            Scalar::Str(_) => Some(DataType::Utf8),
            Scalar::Bin(_) => Some(DataType::Binary),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::I32(v) => Some(*v as i64),
            Scalar::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I32(v) => Some(*v as f64),
            Scalar::I64(v) => Some(*v as f64),
            Scalar::F32(v) => Some(*v as f64),
            Scalar::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        use Scalar::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (F32(a), F32(b)) => a.to_bits() == b.to_bits(),
            (F64(a), F64(b)) => a.to_bits() == b.to_bits(),
            (Str(a), Str(b)) => a == b,
            (Bin(a), Bin(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use Scalar::*;
        scalar_type_order(self).hash(state);
        match self {
            Null => {}
            Bool(b) => b.hash(state),
            I32(i) => i.hash(state),
            I64(i) => i.hash(state),
            F32(f) => f.to_bits().hash(state),
            F64(f) => f.to_bits().hash(state),
            Str(s) => s.hash(state),
            Bin(b) => b.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Scalar::*;
        match self {
            Null => f.write_str("null"),
            Bool(b) => write!(f, "{}", b),
            I32(i) => write!(f, "{}", i),
            I64(i) => write!(f, "{}", i),
            F32(v) => write!(f, "{}", v),
            F64(v) => write!(f, "{}", v),
            Str(s) => f.write_str(s),
            Bin(b) => write!(f, "[binary {} bytes]", b.len()),
        }
    }
}

macro_rules! scalar_from {
    ($t:ty, $variant:ident) => {
        impl From<$t> for Scalar {
            fn from(v: $t) -> Self {
                Scalar::$variant(v)
            }
        }
    };
}

scalar_from!(bool, Bool);
scalar_from!(i32, I32);
scalar_from!(i64, I64);
scalar_from!(f32, F32);
scalar_from!(f64, F64);
scalar_from!(String, Str);
scalar_from!(Vec<u8>, Bin);

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// Fixed-length ordered sequence of values, positionally aligned to a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Record {
    values: Vec<Scalar>,
}

/// Build a [`Record`] from heterogeneous literals: `record![1, "x", Scalar::Null]`.
#[macro_export]
macro_rules! record {
    () => {
        $crate::types::Record::new(::std::vec::Vec::new())
    };
    ($($v:expr),+ $(,)?) => {
        $crate::types::Record::new(vec![$($crate::types::Scalar::from($v)),+])
    };
}

impl Record {
    pub fn new(values: Vec<Scalar>) -> Self {
        Self { values }
    }

    /// All-null record of the given width.
    pub fn nulls(len: usize) -> Self {
        Self {
            values: vec![Scalar::Null; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Scalar> {
        self.values.get(idx)
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Scalar> {
        self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scalar> {
        self.values.iter()
    }

    pub fn set(&mut self, idx: usize, value: impl Into<Scalar>) -> Result<()> {
        let len = self.values.len();
        let slot = self.values.get_mut(idx).ok_or_else(|| {
            Error::Arity(format!(
                "position {} out of range for record of width {}",
                idx, len
            ))
        })?;
        *slot = value.into();
        Ok(())
    }

    /// Replace all values; the width may not change.
    pub fn replace(&mut self, values: Vec<Scalar>) -> Result<()> {
        if values.len() != self.values.len() {
            return Err(Error::Arity(format!(
                "cannot replace {} values with {}: {:?}",
                self.values.len(),
                values.len(),
                values
            )));
        }
        self.values = values;
        Ok(())
    }

    /// Write `values` into `positions`, pairwise.
    pub fn assign(&mut self, positions: &[usize], values: &Record) -> Result<()> {
        if positions.len() != values.len() {
            return Err(Error::Arity(format!(
                "{} values supplied for {} positions: {}",
                values.len(),
                positions.len(),
                values
            )));
        }
        for (&p, v) in positions.iter().zip(values.iter()) {
            self.set(p, v.clone())?;
        }
        Ok(())
    }

    /// New record holding the values at `positions`, in that order.
    pub fn pick(&self, positions: &[usize]) -> Result<Record> {
        positions
            .iter()
            .map(|&p| {
                self.values.get(p).cloned().ok_or_else(|| {
                    Error::Arity(format!(
                        "position {} out of range for record {} of width {}",
                        p,
                        self,
                        self.len()
                    ))
                })
            })
            .collect()
    }

    /// Extract/reorder the columns of `target` from a record laid out as `source`.
    pub fn project(&self, source: &Schema, target: &Schema) -> Result<Record> {
        if self.len() != source.len() {
            return Err(Error::Arity(format!(
                "record {} has {} values but source schema {} has {} columns",
                self,
                self.len(),
                source,
                source.len()
            )));
        }
        let positions = source.positions(&target.columns())?;
        self.pick(&positions)
    }
}

/// Panics when `idx` is out of range; [`Record::get`] is the checked form.
impl Index<usize> for Record {
    type Output = Scalar;

    fn index(&self, idx: usize) -> &Scalar {
        &self.values[idx]
    }
}

impl From<Vec<Scalar>> for Record {
    fn from(values: Vec<Scalar>) -> Self {
        Self { values }
    }
}

impl FromIterator<Scalar> for Record {
    fn from_iter<T: IntoIterator<Item = Scalar>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Scalar;
    type IntoIter = std::slice::Iter<'a, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match v {
                Scalar::Str(s) => write!(f, "{:?}", s)?,
                other => write!(f, "{}", other)?,
            }
        }
        write!(f, ")")
    }
}

/// A record paired with the schema that names its columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    schema: Schema,
    record: Record,
}

impl Entry {
    pub fn new(schema: Schema, record: Record) -> Result<Self> {
        if schema.len() != record.len() {
            return Err(Error::Arity(format!(
                "record {} has {} values but schema {} has {} columns",
                record,
                record.len(),
                schema,
                schema.len()
            )));
        }
        Ok(Self { schema, record })
    }

    pub fn nulls(schema: Schema) -> Self {
        let record = Record::nulls(schema.len());
        Self { schema, record }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn into_parts(self) -> (Schema, Record) {
        (self.schema, self.record)
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    pub fn get(&self, col: impl Into<Col>) -> Result<&Scalar> {
        let idx = self.schema.resolve(&col.into())?;
        Ok(&self.record[idx])
    }

    pub fn set(&mut self, col: impl Into<Col>, value: impl Into<Scalar>) -> Result<()> {
        let idx = self.schema.resolve(&col.into())?;
        self.record.set(idx, value)
    }

    pub fn select(&self, cols: &[Col]) -> Result<Entry> {
        let positions = self.schema.positions(cols)?;
        let schema = self.schema.select(cols)?;
        Ok(Entry {
            schema,
            record: self.record.pick(&positions)?,
        })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (field, v)) in self
            .schema
            .fields
            .iter()
            .zip(self.record.iter())
            .enumerate()
        {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", field.name, v)?;
        }
        write!(f, "}}")
    }
}

/// A group key plus its value entries, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    key: Entry,
    values: Vec<Entry>,
}

impl Group {
    pub fn new(key: Entry, values: Vec<Entry>) -> Self {
        Self { key, values }
    }

    pub fn key(&self) -> &Entry {
        &self.key
    }

    pub fn values(&self) -> &[Entry] {
        &self.values
    }

    pub fn push(&mut self, value: Entry) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_parts(self) -> (Entry, Vec<Entry>) {
        (self.key, self.values)
    }
}

/// Natural ordering of two values of one column.
///
/// Null is least. Floats use IEEE total order. Values of different types
/// fall back to [`scalar_type_order`].
pub fn scalar_cmp(a: &Scalar, b: &Scalar) -> Ordering {
    use Scalar::*;

    match (a, b) {
        (Bool(x), Bool(y)) => x.cmp(y),
        (I32(x), I32(y)) => x.cmp(y),
        (I64(x), I64(y)) => x.cmp(y),
        (F32(x), F32(y)) => x.total_cmp(y),
        (F64(x), F64(y)) => x.total_cmp(y),
        (Str(x), Str(y)) => x.cmp(y),
        (Bin(x), Bin(y)) => x.cmp(y),
        _ => scalar_type_order(a).cmp(&scalar_type_order(b)),
    }
}

/// Rank of a value's variant, null first.
pub fn scalar_type_order(s: &Scalar) -> u8 {
    match s {
        Scalar::Null => 0,
        Scalar::Bool(_) => 1,
        Scalar::I32(_) => 2,
        Scalar::I64(_) => 3,
        Scalar::F32(_) => 4,
        Scalar::F64(_) => 5,
        Scalar::Str(_) => 6,
        Scalar::Bin(_) => 7,
    }
}

/// Feed a tagged, length-prefixed encoding of `scalar` to `hasher`.
pub(crate) fn hash_scalar(scalar: &Scalar, hasher: &mut blake3::Hasher) {
    hasher.update(&[scalar_type_order(scalar)]);
    let fixed: [u8; 8] = match scalar {
        Scalar::Null => return,
        Scalar::Bool(b) => u64::from(*b).to_le_bytes(),
        Scalar::I32(i) => i64::from(*i).to_le_bytes(),
        Scalar::I64(i) => i.to_le_bytes(),
        Scalar::F32(f) => u64::from(f.to_bits()).to_le_bytes(),
        Scalar::F64(f) => f.to_bits().to_le_bytes(),
        Scalar::Str(s) => return hash_len_prefixed(s.as_bytes(), hasher),
        Scalar::Bin(b) => return hash_len_prefixed(b, hasher),
    };
    hasher.update(&fixed);
}

fn hash_len_prefixed(bytes: &[u8], hasher: &mut blake3::Hasher) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    #[test]
    fn record_macro_converts_literals() {
        let r = record![1, "x", 2i64, Scalar::Null, true];
        assert_eq!(
            r.values(),
            &[
                Scalar::I32(1),
                Scalar::Str("x".into()),
                Scalar::I64(2),
                Scalar::Null,
                Scalar::Bool(true)
            ]
        );
    }

    #[test]
    fn equality_is_structural_including_nan() {
        let a = record![f64::NAN, 1];
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(record![1], record![1i64]);
    }

    #[test]
    fn set_out_of_range_is_arity_error() {
        let mut r = Record::nulls(2);
        assert!(r.set(1, 5).is_ok());
        assert!(matches!(r.set(2, 5), Err(Error::Arity(_))));
    }

    #[test]
    fn replace_rejects_width_change() {
        let mut r = record![1, 2];
        assert!(matches!(
            r.replace(vec![Scalar::I32(1)]),
            Err(Error::Arity(_))
        ));
        r.replace(vec![Scalar::I32(3), Scalar::I32(4)]).unwrap();
        assert_eq!(r, record![3, 4]);
    }

    #[test]
    fn project_extracts_and_reorders() {
        let source = Schema::untyped(["A", "B", "C"]);
        let target = Schema::untyped(["C", "A"]);
        let r = record![1, 2, 3];
        assert_eq!(r.project(&source, &target).unwrap(), record![3, 1]);
    }

    #[test]
    fn pick_out_of_range_is_arity_error() {
        let r = record![1, 2];
        assert_eq!(r.pick(&[1, 0]).unwrap(), record![2, 1]);
        assert!(matches!(r.pick(&[0, 2]), Err(Error::Arity(_))));
    }

    #[test]
    fn project_checks_source_width() {
        let source = Schema::untyped(["A", "B"]);
        let err = record![1].project(&source, &source).unwrap_err();
        assert!(matches!(err, Error::Arity(_)));
    }

    #[test]
    fn entry_width_must_match_schema() {
        let schema = Schema::new(vec![Field::untyped("A")]);
        assert!(Entry::new(schema.clone(), record![1]).is_ok());
        assert!(matches!(
            Entry::new(schema, record![1, 2]),
            Err(Error::Arity(_))
        ));
    }

    #[test]
    fn entry_get_and_set_by_name() {
        let mut e = Entry::nulls(Schema::untyped(["A", "B"]));
        e.set("B", "hello").unwrap();
        assert_eq!(e.get("B").unwrap(), &Scalar::from("hello"));
        assert_eq!(e.get(0).unwrap(), &Scalar::Null);
        assert!(e.get("C").is_err());
    }

    #[test]
    fn nulls_sort_first() {
        assert_eq!(scalar_cmp(&Scalar::Null, &Scalar::I32(0)), Ordering::Less);
        assert_eq!(scalar_cmp(&Scalar::Null, &Scalar::Null), Ordering::Equal);
        assert_eq!(
            scalar_cmp(&Scalar::Str("b".into()), &Scalar::Str("a".into())),
            Ordering::Greater
        );
    }
}
