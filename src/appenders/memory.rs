//! In-memory appender
//!
//! Captures delivered messages into a shared buffer. A [`MemoryHandle`]
//! stays with the caller after the appender is moved into a logger, so the
//! captured messages and lifecycle calls can be inspected from outside.

use crate::core::{Appender, Level, LogMessage, LoggerError, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A message together with the label of the appender that received it
#[derive(Debug, Clone)]
pub struct CapturedMessage {
    pub label: String,
    pub message: LogMessage,
}

#[derive(Debug, Default)]
struct Shared {
    records: Mutex<Vec<CapturedMessage>>,
    flushes: AtomicUsize,
    shutdowns: AtomicUsize,
    late_appends: AtomicUsize,
}

pub struct MemoryAppender {
    label: String,
    shared: Arc<Shared>,
    closed: bool,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self {
            label: "memory".to_string(),
            shared: Arc::new(Shared::default()),
            closed: false,
        }
    }

    /// Another appender writing into the same buffer under a different label
    #[must_use]
    pub fn labelled(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shared: Arc::clone(&self.shared),
            closed: false,
        }
    }

    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for MemoryAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, message: &LogMessage) -> Result<()> {
        if self.closed {
            self.shared.late_appends.fetch_add(1, Ordering::SeqCst);
            return Err(LoggerError::LoggerClosed);
        }

        self.shared.records.lock().push(CapturedMessage {
            label: self.label.clone(),
            message: message.clone(),
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.shared.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.closed = true;
        self.shared.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn kind(&self) -> &str {
        "memory"
    }
}

/// Read side of a [`MemoryAppender`]
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    shared: Arc<Shared>,
}

impl MemoryHandle {
    pub fn captured(&self) -> Vec<CapturedMessage> {
        self.shared.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<LogMessage> {
        self.shared
            .records
            .lock()
            .iter()
            .map(|record| record.message.clone())
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.shared
            .records
            .lock()
            .iter()
            .map(|record| record.message.text().to_string())
            .collect()
    }

    pub fn levels(&self) -> Vec<Level> {
        self.shared
            .records
            .lock()
            .iter()
            .map(|record| record.message.level())
            .collect()
    }

    /// Receiving appender label for each captured message, in arrival order
    pub fn labels(&self) -> Vec<String> {
        self.shared
            .records
            .lock()
            .iter()
            .map(|record| record.label.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shared.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.shared.records.lock().clear();
    }

    pub fn flush_count(&self) -> usize {
        self.shared.flushes.load(Ordering::SeqCst)
    }

    pub fn shutdown_count(&self) -> usize {
        self.shared.shutdowns.load(Ordering::SeqCst)
    }

    /// Appends that arrived after the appender was shut down
    pub fn late_appends(&self) -> usize {
        self.shared.late_appends.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_messages() -> Result<()> {
        let mut appender = MemoryAppender::new();
        let handle = appender.handle();

        appender.append(&LogMessage::new(Level::Info, "one"))?;
        appender.append(&LogMessage::new(Level::Debug, "two"))?;

        assert_eq!(handle.texts(), vec!["one".to_string(), "two".to_string()]);
        assert_eq!(handle.levels(), vec![Level::Info, Level::Debug]);
        Ok(())
    }

    #[test]
    fn test_rejects_after_shutdown() -> Result<()> {
        let mut appender = MemoryAppender::new();
        let handle = appender.handle();

        appender.shutdown()?;
        assert!(appender.append(&LogMessage::new(Level::Info, "late")).is_err());

        assert_eq!(handle.shutdown_count(), 1);
        assert_eq!(handle.late_appends(), 1);
        assert!(handle.is_empty());
        Ok(())
    }

    #[test]
    fn test_labelled_share_buffer() -> Result<()> {
        let mut a = MemoryAppender::new();
        let mut b = a.labelled("b");
        let handle = a.handle();

        a.append(&LogMessage::new(Level::Info, "x"))?;
        b.append(&LogMessage::new(Level::Info, "y"))?;

        assert_eq!(handle.labels(), vec!["memory".to_string(), "b".to_string()]);
        Ok(())
    }
}
