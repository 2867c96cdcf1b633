//! CSV file tap.
//!
//! Cells are text. On read each cell is converted to its field's declared
//! type (untyped fields stay strings); the configured null token reads back
//! as null. With headers on, columns are matched by name, so the file's
//! column order may differ from the schema's.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use plumb_core::config::PlumbConfig;
use plumb_core::id::TapId;
use plumb_core::schema::Schema;
use plumb_core::types::{Record, Scalar};
use plumb_core::validate::coerce;

use crate::error::{Error, Result};
use crate::tap::{check_width, RecordIter, RecordWriter, Sink, Source, Tap};
use crate::trace;

#[derive(Debug, Clone)]
pub struct CsvTap {
    id: TapId,
    schema: Schema,
    path: PathBuf,
    cfg: PlumbConfig,
}

impl CsvTap {
    pub fn new(schema: Schema, path: impl AsRef<Path>) -> Self {
        Self::with_config(schema, path, PlumbConfig::default())
    }

    pub fn with_config(schema: Schema, path: impl AsRef<Path>, cfg: PlumbConfig) -> Self {
        Self {
            id: TapId::random("CsvTap"),
            schema,
            path: path.as_ref().to_path_buf(),
            cfg,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format_error(&self, msg: String) -> Error {
        Error::Format {
            tap: format!("{} ({})", self.id, self.path.display()),
            msg,
        }
    }

    /// File column index for each schema field.
    fn column_positions(&self, headers: Option<&::csv::StringRecord>) -> Result<Vec<usize>> {
        let Some(headers) = headers else {
            return Ok((0..self.schema.len()).collect());
        };
        self.schema
            .fields
            .iter()
            .map(|f| {
                headers.iter().position(|h| h == f.name).ok_or_else(|| {
                    self.format_error(format!(
                        "column '{}' missing from header {:?}",
                        f.name,
                        headers.iter().collect::<Vec<_>>()
                    ))
                })
            })
            .collect()
    }

    fn parse_row(&self, positions: &[usize], row: &::csv::StringRecord) -> Result<Record> {
        if !self.cfg.csv_has_headers && row.len() != self.schema.len() {
            return Err(self.format_error(format!(
                "line {} has {} cells but schema {} has {} columns",
                row.position().map(|p| p.line()).unwrap_or_default(),
                row.len(),
                self.schema,
                self.schema.len()
            )));
        }
        self.schema
            .fields
            .iter()
            .zip(positions)
            .map(|(field, &pos)| {
                let cell = row.get(pos).ok_or_else(|| {
                    self.format_error(format!("row {:?} has no cell for '{}'", row, field.name))
                })?;
                if cell == self.cfg.null_token {
                    return Ok(Scalar::Null);
                }
                let text = Scalar::from(cell);
                match field.data_type {
                    None => Ok(text),
                    Some(t) => Ok(coerce(&text, t, field.nullable)?),
                }
            })
            .collect()
    }

    fn cell(&self, field: &str, value: &Scalar) -> Result<String> {
        match value {
            Scalar::Null => Ok(self.cfg.null_token.clone()),
            Scalar::Str(s) if *s == self.cfg.null_token => Err(self.format_error(format!(
                "field '{}': text {:?} is the null token and would read back as null",
                field, s
            ))),
            Scalar::Bin(_) => Err(plumb_core::Error::Unsupported(format!(
                "field '{}': binary values have no CSV text form",
                field
            ))
            .into()),
            other => Ok(other.to_string()),
        }
    }
}

impl Tap for CsvTap {
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

impl Source for CsvTap {
    fn open_read(&self) -> Result<RecordIter<'_>> {
        trace::open("read", self.id.as_str());
        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(self.cfg.csv_delimiter)
            .has_headers(self.cfg.csv_has_headers)
            .from_path(&self.path)?;
        let positions = if self.cfg.csv_has_headers {
            let headers = reader.headers()?.clone();
            self.column_positions(Some(&headers))?
        } else {
            self.column_positions(None)?
        };
        Ok(Box::new(reader.into_records().map(move |row| {
            let row = row?;
            self.parse_row(&positions, &row)
        })))
    }
}

impl Sink for CsvTap {
    fn open_write(&mut self) -> Result<Box<dyn RecordWriter + '_>> {
        trace::open("write", self.id.as_str());
        let mut writer = ::csv::WriterBuilder::new()
            .delimiter(self.cfg.csv_delimiter)
            .from_path(&self.path)?;
        if self.cfg.csv_has_headers {
            writer.write_record(self.schema.names())?;
        }
        Ok(Box::new(CsvWriter {
            tap: self,
            writer,
            written: 0,
        }))
    }
}

struct CsvWriter<'a> {
    tap: &'a CsvTap,
    writer: ::csv::Writer<File>,
    written: usize,
}

impl RecordWriter for CsvWriter<'_> {
    fn write(&mut self, record: &Record) -> Result<()> {
        check_width(&self.tap.id, &self.tap.schema, record)?;
        let cells = self
            .tap
            .schema
            .fields
            .iter()
            .zip(record.iter())
            .map(|(f, v)| self.tap.cell(&f.name, v))
            .collect::<Result<Vec<_>>>()?;
        self.writer.write_record(&cells)?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.writer.flush()?;
        trace::transferred("write", self.tap.id.as_str(), self.written);
        Ok(())
    }
}
