//! JSON appender for structured logging

use crate::core::{Appender, LogMessage, OutputFormat, Result, TimestampFormat};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON file appender
///
/// Writes each message as a single-line JSON object (JSONL format).
/// Message parameters become top-level keys.
pub struct JsonAppender {
    writer: BufWriter<File>,
    pretty: bool,
    timestamp_format: TimestampFormat,
}

impl JsonAppender {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            pretty: false,
            timestamp_format: TimestampFormat::UnixMillis,
        })
    }

    /// Pretty-print each object across several lines
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl Appender for JsonAppender {
    fn append(&mut self, message: &LogMessage) -> Result<()> {
        let object = serde_json::Value::Object(OutputFormat::json_object(
            message,
            &self.timestamp_format,
        )?);

        let json = if self.pretty {
            serde_json::to_string_pretty(&object)?
        } else {
            serde_json::to_string(&object)?
        };

        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn kind(&self) -> &str {
        "json"
    }
}
