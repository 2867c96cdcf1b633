//! Tab-delimited rendering of a result set view.

use std::fmt;
use std::io::{self, Write};

use plumb_core::config::PlumbConfig;
use plumb_core::error::Result;
use plumb_core::types::Scalar;

use crate::result::ResultSet;

/// Renders the materialized view of a [`ResultSet`]: one header line with
/// the selected column names, then one line per record.
#[derive(Debug, Clone)]
pub struct PrettyPrinter<'a> {
    result: &'a ResultSet,
    header: bool,
    null: String,
}

impl<'a> PrettyPrinter<'a> {
    pub fn new(result: &'a ResultSet) -> Self {
        Self::with_config(result, &PlumbConfig::default())
    }

    pub fn with_config(result: &'a ResultSet, cfg: &PlumbConfig) -> Self {
        Self {
            result,
            header: cfg.pretty_header,
            null: cfg.pretty_null.clone(),
        }
    }

    pub fn no_header(mut self) -> Self {
        self.header = false;
        self
    }

    pub fn null_token(mut self, token: impl Into<String>) -> Self {
        self.null = token.into();
        self
    }

    pub fn render(&self) -> Result<String> {
        let schema = self.result.selected_schema()?;
        let rows = self.result.as_record_list()?;

        let mut out = String::new();
        if self.header {
            out.push_str(&schema.names().join("\t"));
            out.push('\n');
        }
        for row in rows.iter() {
            let line = row
                .iter()
                .map(|v| match v {
                    Scalar::Null => self.null.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\t");
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let text = self
            .render()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        w.write_all(text.as_bytes())
    }

    /// Print to stdout.
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock)
    }
}

impl fmt::Display for PrettyPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(text) => f.write_str(&text),
            Err(e) => write!(f, "<unprintable: {}>", e),
        }
    }
}
