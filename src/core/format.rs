//! Rendering of log messages for appenders
//!
//! - [`TimestampFormat`]: how the message timestamp is printed
//! - [`OutputFormat`]: text, JSON or logfmt line layout

use super::error::{LoggerError, Result};
use super::message::LogMessage;
use super::params::ParamValue;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use severity_logger::TimestampFormat;
/// use chrono::Utc;
///
/// let timestamp = TimestampFormat::Iso8601.format(&Utc::now()).unwrap();
/// assert!(timestamp.ends_with('Z'));
///
/// assert!(TimestampFormat::custom("%Y/%m/%d").is_ok());
/// assert!(TimestampFormat::custom("%Q").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in seconds
    Unix,

    /// Unix timestamp in milliseconds
    UnixMillis,

    /// Any strftime-compatible format string
    ///
    /// Build it with [`TimestampFormat::custom`] to have the pattern checked.
    Custom(String),
}

fn invalid_pattern(pattern: &str) -> LoggerError {
    LoggerError::config(
        "timestamp format",
        format!("unsupported strftime pattern '{}'", pattern),
    )
}

impl TimestampFormat {
    /// Checked constructor for [`TimestampFormat::Custom`]
    pub fn custom(pattern: impl Into<String>) -> Result<Self> {
        let format = TimestampFormat::Custom(pattern.into());
        format.validate()?;
        Ok(format)
    }

    /// Reject custom patterns chrono cannot render
    pub fn validate(&self) -> Result<()> {
        match self {
            TimestampFormat::Custom(pattern) => {
                if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                    Err(invalid_pattern(pattern))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    pub fn format(&self, datetime: &DateTime<Utc>) -> Result<String> {
        let pattern = match self {
            TimestampFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S%.3fZ",
            TimestampFormat::Iso8601Micros => "%Y-%m-%dT%H:%M:%S%.6fZ",
            TimestampFormat::Rfc3339 => return Ok(datetime.to_rfc3339()),
            TimestampFormat::Unix => return Ok(datetime.timestamp().to_string()),
            TimestampFormat::UnixMillis => return Ok(datetime.timestamp_millis().to_string()),
            TimestampFormat::Custom(pattern) => pattern.as_str(),
        };

        // Unknown specifiers surface as fmt::Error here
        let mut rendered = String::new();
        write!(rendered, "{}", datetime.format(pattern)).map_err(|_| invalid_pattern(pattern))?;
        Ok(rendered)
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }

    fn json_value(&self, datetime: &DateTime<Utc>) -> Result<serde_json::Value> {
        Ok(match self {
            TimestampFormat::Unix => serde_json::Value::Number(datetime.timestamp().into()),
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(datetime.timestamp_millis().into())
            }
            _ => serde_json::Value::String(self.format(datetime)?),
        })
    }
}

/// Line layout for log messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `[2025-01-08T10:30:45.123Z] [INFO     ] main - Request processed`
    #[default]
    Text,

    /// `{"timestamp":"...","level":"INFO","message":"Request processed"}`
    Json,

    /// `timestamp=... level=INFO message="Request processed"`
    Logfmt,
}

impl OutputFormat {
    /// Format a message as a single line, without trailing newline
    pub fn format(&self, message: &LogMessage, timestamp_format: &TimestampFormat) -> Result<String> {
        match self {
            OutputFormat::Text => Self::format_text(message, timestamp_format),
            OutputFormat::Json => Self::format_json(message, timestamp_format),
            OutputFormat::Logfmt => Self::format_logfmt(message, timestamp_format),
        }
    }

    fn format_text(message: &LogMessage, timestamp_format: &TimestampFormat) -> Result<String> {
        let base = format!(
            "[{}] [{:9}] {} - {}",
            timestamp_format.format(message.timestamp())?,
            message.level().to_str(),
            message.thread_label(),
            message.text()
        );

        Ok(if message.params().is_empty() {
            base
        } else {
            format!("{} {}", base, message.params().format_fields())
        })
    }

    /// JSON object; the fixed keys win over parameters with the same name
    pub(crate) fn json_object(
        message: &LogMessage,
        timestamp_format: &TimestampFormat,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        let mut json_obj = serde_json::Map::new();

        for (key, value) in message.params().iter() {
            json_obj.insert(key.clone(), value.to_json_value());
        }

        json_obj.insert(
            "timestamp".to_string(),
            timestamp_format.json_value(message.timestamp())?,
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(message.level().to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(message.text().to_string()),
        );
        json_obj.insert(
            "thread_id".to_string(),
            serde_json::Value::String(message.thread_id().to_string()),
        );
        if let Some(name) = message.thread_name() {
            json_obj.insert(
                "thread_name".to_string(),
                serde_json::Value::String(name.to_string()),
            );
        }
        if let Some(location) = message.location() {
            json_obj.insert(
                "file".to_string(),
                serde_json::Value::String(location.file.clone()),
            );
            json_obj.insert("line".to_string(), serde_json::Value::Number(location.line.into()));
            json_obj.insert(
                "module_path".to_string(),
                serde_json::Value::String(location.module_path.clone()),
            );
        }

        Ok(json_obj)
    }

    fn format_json(message: &LogMessage, timestamp_format: &TimestampFormat) -> Result<String> {
        Ok(serde_json::Value::Object(Self::json_object(message, timestamp_format)?).to_string())
    }

    fn format_logfmt(message: &LogMessage, timestamp_format: &TimestampFormat) -> Result<String> {
        let mut parts = vec![
            format!(
                "timestamp={}",
                escape_logfmt_value(&timestamp_format.format(message.timestamp())?)
            ),
            format!("level={}", message.level().to_str()),
            format!("message={}", quote_logfmt_value(message.text())),
            format!("thread_id={}", escape_logfmt_value(message.thread_id())),
        ];

        if let Some(name) = message.thread_name() {
            parts.push(format!("thread_name={}", escape_logfmt_value(name)));
        }
        if let Some(location) = message.location() {
            parts.push(format!("file={}", escape_logfmt_value(&location.file)));
            parts.push(format!("line={}", location.line));
        }

        for (key, value) in message.params().iter() {
            let formatted_value = match value {
                ParamValue::String(s) => quote_logfmt_value(s),
                other => other.to_string(),
            };
            parts.push(format!("{}={}", escape_logfmt_key(key), formatted_value));
        }

        Ok(parts.join(" "))
    }
}

fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn escape_logfmt_value(value: &str) -> String {
    if value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
