//! Logical schema types. Pure data; no engine dependency here.
//!
//! A schema is an ordered, fixed set of named and optionally typed columns.
//! Columns are referenced by name or position through [`Col`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    Binary,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Boolean => "Boolean",
            DataType::Int32 => "Int32",
            DataType::Int64 => "Int64",
            DataType::Float32 => "Float32",
            DataType::Float64 => "Float64",
            DataType::Utf8 => "Utf8",
            DataType::Binary => "Binary",
        };
        f.write_str(s)
    }
}

/// A named column. `data_type = None` means the column is untyped.
///
/// A typed, non-nullable field is "primitive-like": the validator refuses
/// nulls and values of any other type for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: Option<DataType>,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: Some(data_type),
            nullable,
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            nullable: true,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.data_type.is_some() && !self.nullable
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.data_type, self.nullable) {
            (None, _) => write!(f, "{}", self.name),
            (Some(t), false) => write!(f, "{}:{}", self.name, t),
            (Some(t), true) => write!(f, "{}:{}?", self.name, t),
        }
    }
}

/// Column reference: by name or by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Col {
    Name(String),
    Pos(usize),
}

impl From<&str> for Col {
    fn from(s: &str) -> Self {
        Col::Name(s.to_string())
    }
}

impl From<String> for Col {
    fn from(s: String) -> Self {
        Col::Name(s)
    }
}

impl From<&String> for Col {
    fn from(s: &String) -> Self {
        Col::Name(s.clone())
    }
}

impl From<usize> for Col {
    fn from(p: usize) -> Self {
        Col::Pos(p)
    }
}

impl fmt::Display for Col {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Col::Name(n) => write!(f, "{}", n),
            Col::Pos(p) => write!(f, "#{}", p),
        }
    }
}

/// Build a column selector list, e.g. `cols(["A", "B"])` or `cols([0, 2])`.
pub fn cols<I, C>(items: I) -> Vec<Col>
where
    I: IntoIterator<Item = C>,
    C: Into<Col>,
{
    items.into_iter().map(Into::into).collect()
}

/// Concatenate column groups, dropping repeats (first occurrence wins).
pub fn merge_cols<'a, I>(groups: I) -> Vec<Col>
where
    I: IntoIterator<Item = &'a [Col]>,
{
    let mut out: Vec<Col> = Vec::new();
    for group in groups {
        for c in group {
            if !out.contains(c) {
                out.push(c.clone());
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Schema of untyped columns.
    pub fn untyped<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names.into_iter().map(Field::untyped).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// This schema as a selector over its own columns (by name).
    pub fn columns(&self) -> Vec<Col> {
        self.fields.iter().map(|f| Col::Name(f.name.clone())).collect()
    }

    /// True when both schemas have the same column names in the same order.
    pub fn same_names(&self, other: &Schema) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(other.fields.iter())
                .all(|(a, b)| a.name == b.name)
    }

    /// Resolve a column reference to a position.
    ///
    /// Names must resolve uniquely; duplicated names are ambiguous.
    pub fn resolve(&self, col: &Col) -> Result<usize> {
        match col {
            Col::Pos(p) => {
                if *p < self.fields.len() {
                    Ok(*p)
                } else {
                    Err(Error::FieldResolution(format!(
                        "position {} out of range for schema {}",
                        p, self
                    )))
                }
            }
            Col::Name(name) => {
                let mut found = self
                    .fields
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| &f.name == name)
                    .map(|(i, _)| i);
                match (found.next(), found.next()) {
                    (Some(i), None) => Ok(i),
                    (None, _) => Err(Error::FieldResolution(format!(
                        "column '{}' not found in schema {}",
                        name, self
                    ))),
                    (Some(_), Some(_)) => Err(Error::FieldResolution(format!(
                        "column '{}' is ambiguous in schema {}",
                        name, self
                    ))),
                }
            }
        }
    }

    pub fn positions(&self, cols: &[Col]) -> Result<Vec<usize>> {
        cols.iter().map(|c| self.resolve(c)).collect()
    }

    /// Sub-schema made of `cols`, in selector order.
    pub fn select(&self, cols: &[Col]) -> Result<Schema> {
        let positions = self.positions(cols).map_err(|e| match e {
            Error::FieldResolution(msg) => Error::FieldResolution(format!(
                "selected fields [{}] must be contained in schema {}: {}",
                join_cols(cols),
                self,
                msg
            )),
            other => other,
        })?;
        Ok(Schema {
            fields: positions
                .into_iter()
                .map(|p| self.fields[p].clone())
                .collect(),
        })
    }

    pub fn contains(&self, cols: &[Col]) -> bool {
        self.positions(cols).is_ok()
    }
}

impl FromIterator<Field> for Schema {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        write!(f, "]")
    }
}

pub(crate) fn join_cols(cols: &[Col]) -> String {
    cols.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
