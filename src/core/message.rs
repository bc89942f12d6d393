//! Immutable log message

use super::level::Level;
use super::params::{MessageParams, ParamValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn current_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn current_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Source location captured by the logging macros
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub module_path: String,
}

/// A single log message
///
/// The level is fixed at construction. The `with_*` methods consume the
/// message, so it can only be enriched before it is handed to a logger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMessage {
    level: Level,
    text: String,
    timestamp: DateTime<Utc>,
    thread_id: String,
    thread_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    #[serde(skip_serializing_if = "MessageParams::is_empty", default)]
    params: MessageParams,
}

impl LogMessage {
    /// Escape newlines, carriage returns and tabs so one message stays one line
    fn sanitize(text: &str) -> String {
        text.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: Self::sanitize(&text.into()),
            timestamp: Utc::now(),
            thread_id: current_thread_id(),
            thread_name: current_thread_name(),
            location: None,
            params: MessageParams::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, file: &str, line: u32, module_path: &str) -> Self {
        self.location = Some(Location {
            file: file.to_string(),
            line,
            module_path: module_path.to_string(),
        });
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: MessageParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }

    /// Thread name if the thread has one, its id otherwise
    pub fn thread_label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn params(&self) -> &MessageParams {
        &self.params
    }

    /// Render as `LEVEL text key=value ...` without timestamp or thread
    pub fn render(&self) -> String {
        if self.params.is_empty() {
            format!("{} {}", self.level, self.text)
        } else {
            format!("{} {} {}", self.level, self.text, self.params.format_fields())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_keeps_level() {
        let message = LogMessage::new(Level::Notice, "disk at 80%");
        assert_eq!(message.level(), Level::Notice);
        assert_eq!(message.text(), "disk at 80%");
        assert!(message.location().is_none());
        assert!(message.params().is_empty());
    }

    #[test]
    fn test_injection_is_escaped() {
        let message = LogMessage::new(Level::Info, "login\nERROR fake\tentry\r");
        assert_eq!(message.text(), "login\\nERROR fake\\tentry\\r");
    }

    #[test]
    fn test_render() {
        let message = LogMessage::new(Level::Error, "query failed")
            .with_param("table", "users")
            .with_param("attempt", 3);
        assert_eq!(message.render(), "ERROR query failed attempt=3 table=users");
    }

    #[test]
    fn test_location() {
        let message = LogMessage::new(Level::Debug, "here").with_location("src/app.rs", 42, "app");
        let location = message.location().unwrap();
        assert_eq!(location.file, "src/app.rs");
        assert_eq!(location.line, 42);
        assert_eq!(location.module_path, "app");
    }

    #[test]
    fn test_thread_label_falls_back_to_id() {
        let handle = std::thread::spawn(|| LogMessage::new(Level::Info, "unnamed"));
        let message = handle.join().unwrap();
        assert!(message.thread_name().is_none());
        assert_eq!(message.thread_label(), message.thread_id());
    }
}
