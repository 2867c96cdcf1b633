//! Newline-delimited JSON tap: one object per record, keyed by column name.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;

use plumb_core::id::TapId;
use plumb_core::schema::{DataType, Schema};
use plumb_core::types::{Record, Scalar};
use plumb_core::validate::coerce;

use crate::error::{Error, Result};
use crate::tap::{check_width, RecordIter, RecordWriter, Sink, Source, Tap};
use crate::trace;

#[derive(Debug, Clone)]
pub struct JsonlTap {
    id: TapId,
    schema: Schema,
    path: PathBuf,
}

impl JsonlTap {
    pub fn new(schema: Schema, path: impl AsRef<Path>) -> Self {
        Self {
            id: TapId::random("JsonlTap"),
            schema,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing keys read as null; typed fields are coerced to their type.
    fn parse_line(&self, line_no: usize, line: &str) -> Result<Record> {
        let obj: serde_json::Map<String, Value> =
            serde_json::from_str(line).map_err(|e| Error::Format {
                tap: format!("{} ({})", self.id, self.path.display()),
                msg: format!("line {}: {}", line_no, e),
            })?;
        self.schema
            .fields
            .iter()
            .map(|field| {
                let value = json_to_scalar(obj.get(&field.name).unwrap_or(&Value::Null), field.data_type);
                match field.data_type {
                    None => Ok(value),
                    Some(t) => Ok(coerce(&value, t, field.nullable)?),
                }
            })
            .collect()
    }
}

impl Tap for JsonlTap {
    fn id(&self) -> &TapId {
        &self.id
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

impl Source for JsonlTap {
    fn open_read(&self) -> Result<RecordIter<'_>> {
        trace::open("read", self.id.as_str());
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(Box::new(
            reader
                .lines()
                .enumerate()
                .filter(|(_, line)| !matches!(line, Ok(l) if l.trim().is_empty()))
                .map(move |(i, line)| self.parse_line(i + 1, &line?)),
        ))
    }
}

impl Sink for JsonlTap {
    fn open_write(&mut self) -> Result<Box<dyn RecordWriter + '_>> {
        trace::open("write", self.id.as_str());
        let file = File::create(&self.path)?;
        Ok(Box::new(JsonlWriter {
            tap: self,
            writer: BufWriter::new(file),
            written: 0,
        }))
    }
}

struct JsonlWriter<'a> {
    tap: &'a JsonlTap,
    writer: BufWriter<File>,
    written: usize,
}

impl RecordWriter for JsonlWriter<'_> {
    fn write(&mut self, record: &Record) -> Result<()> {
        check_width(&self.tap.id, &self.tap.schema, record)?;
        let mut obj = BTreeMap::new();
        for (field, value) in self.tap.schema.fields.iter().zip(record.iter()) {
            obj.insert(field.name.as_str(), scalar_to_json(value));
        }
        let line = serde_json::to_string(&obj)?;
        writeln!(self.writer, "{}", line)?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.writer.flush()?;
        trace::transferred("write", self.tap.id.as_str(), self.written);
        Ok(())
    }
}

fn scalar_to_json(v: &Scalar) -> Value {
    use Scalar::*;
    match v {
        Null => Value::Null,
        Bool(b) => Value::Bool(*b),
        I32(i) => Value::from(*i),
        I64(i) => Value::from(*i),
        F32(f) => Value::from(*f as f64),
        F64(f) => Value::from(*f),
        Str(s) => Value::String(s.clone()),
        Bin(b) => Value::from(b.clone()),
    }
}

fn json_to_scalar(v: &Value, hint: Option<DataType>) -> Scalar {
    match v {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Scalar::I64(i),
            (None, Some(f)) => Scalar::F64(f),
            (None, None) => Scalar::Str(n.to_string()),
        },
        Value::String(s) => Scalar::Str(s.clone()),
        Value::Array(items) if hint == Some(DataType::Binary) => {
            let bytes: Option<Vec<u8>> = items
                .iter()
                .map(|i| i.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect();
            bytes.map(Scalar::Bin).unwrap_or_else(|| Scalar::Str(v.to_string()))
        }
        other => Scalar::Str(other.to_string()),
    }
}
