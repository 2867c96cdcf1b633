//! Harness configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlumbConfig {
    /// Field delimiter for CSV taps.
    pub csv_delimiter: u8,

    /// Whether CSV taps read and write a header row.
    pub csv_has_headers: bool,

    /// Text a CSV tap writes for a null value, and reads back as null.
    pub null_token: String,

    /// Text the pretty printer shows for a null value.
    pub pretty_null: String,

    /// Whether the pretty printer emits the column header row.
    pub pretty_header: bool,
}

impl Default for PlumbConfig {
    fn default() -> Self {
        Self {
            csv_delimiter: b',',
            csv_has_headers: true,
            null_token: String::new(),
            pretty_null: "null".to_string(),
            pretty_header: true,
        }
    }
}

impl PlumbConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `PLUMB_CSV_DELIMITER`: single ASCII character
    /// - `PLUMB_CSV_HAS_HEADERS`: `true` / `false`
    /// - `PLUMB_NULL_TOKEN`: CSV text for null
    /// - `PLUMB_PRETTY_NULL`: pretty-printer text for null
    /// - `PLUMB_PRETTY_HEADER`: `true` / `false`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("PLUMB_CSV_DELIMITER") {
            if let [b] = s.as_bytes() {
                cfg.csv_delimiter = *b;
            }
        }

        if let Ok(s) = std::env::var("PLUMB_CSV_HAS_HEADERS") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.csv_has_headers = v;
            }
        }

        if let Ok(s) = std::env::var("PLUMB_NULL_TOKEN") {
            cfg.null_token = s;
        }

        if let Ok(s) = std::env::var("PLUMB_PRETTY_NULL") {
            cfg.pretty_null = s;
        }

        if let Ok(s) = std::env::var("PLUMB_PRETTY_HEADER") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.pretty_header = v;
            }
        }

        cfg
    }

    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    pub fn with_csv_headers(mut self, has_headers: bool) -> Self {
        self.csv_has_headers = has_headers;
        self
    }

    pub fn with_null_token(mut self, token: impl Into<String>) -> Self {
        self.null_token = token.into();
        self
    }
}
