//! Severity-filtered logger
//!
//! A [`Logger`] holds an active [`LevelMask`] and an ordered set of named
//! appenders. A message is fanned out to every appender, in registration
//! order, when its level intersects the mask; otherwise it is dropped
//! without error.
//!
//! # Lifecycle
//!
//! `Unconfigured` (no appenders yet) → `Active` → `Shutdown`. Shutdown is
//! terminal: afterwards `log`, `set_appender`, `remove_appender`,
//! `set_level`, `flush` and `shutdown` all return
//! [`LoggerError::LoggerClosed`].
//!
//! # Concurrency
//!
//! Configuration lives behind a single `RwLock`. Mutations take the write
//! lock and never interleave. `log` holds the read lock while it dispatches,
//! so concurrent callers run in parallel and only contend on the per-appender
//! mutex of an appender they both target. `shutdown` takes the write lock and
//! therefore waits for every in-flight `log`; no message reaches an appender
//! after its shutdown hook returned.
//!
//! Appenders must not log through the logger that owns them.

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    level::{Level, LevelMask},
    message::LogMessage,
    metrics::LoggerMetrics,
    params::MessageParams,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

/// Default time a queued appender waits for its worker to drain on shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a logger is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerLifecycle {
    Unconfigured,
    Active,
    Shutdown,
}

/// Copy of one appender registration, as returned by [`Logger::get_appenders`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppenderInfo {
    pub name: String,
    pub kind: String,
}

struct RegisteredAppender {
    name: String,
    kind: String,
    appender: Mutex<Box<dyn Appender>>,
}

struct LoggerState {
    mask: LevelMask,
    appenders: Vec<RegisteredAppender>,
    shut_down: bool,
}

impl LoggerState {
    fn ensure_open(&self) -> Result<()> {
        if self.shut_down {
            Err(LoggerError::LoggerClosed)
        } else {
            Ok(())
        }
    }
}

pub struct Logger {
    state: RwLock<LoggerState>,
    /// Metrics for observability (delivered, filtered, failures)
    metrics: LoggerMetrics,
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Run an appender call, turning a panic into an error
pub(crate) fn isolate(call: impl FnOnce() -> Result<()>) -> Result<()> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(panic_info) => Err(LoggerError::AppenderPanicked(panic_message(
            panic_info.as_ref(),
        ))),
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LoggerError::invalid_appender_name(
            "appender names must not be empty",
        ));
    }
    Ok(())
}

impl Logger {
    /// Create a logger that accepts every level
    #[must_use]
    pub fn new() -> Self {
        Self::with_level(LevelMask::ALL)
    }

    #[must_use]
    pub fn with_level(mask: impl Into<LevelMask>) -> Self {
        Self {
            state: RwLock::new(LoggerState {
                mask: mask.into(),
                appenders: Vec::new(),
                shut_down: false,
            }),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use severity_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .level(Level::Error | Level::Critical)
    ///     .appender("memory", MemoryAppender::new())
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.level().bits(), 12);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Log a message
    ///
    /// Forwards to every registered appender when `message.level()`
    /// intersects the active mask. Filtered messages are dropped silently.
    /// A failing or panicking appender is reported on stderr and does not
    /// stop delivery to the others.
    pub fn log(&self, message: &LogMessage) -> Result<()> {
        let state = self.state.read();
        state.ensure_open()?;

        if !state.mask.matches(message.level()) {
            self.metrics.record_filtered();
            return Ok(());
        }

        let mut reached = 0usize;
        for registered in &state.appenders {
            let mut appender = registered.appender.lock();
            match isolate(|| appender.append(message)) {
                Ok(()) => {
                    reached += 1;
                    continue;
                }
                Err(LoggerError::AppenderPanicked(msg)) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender '{}' panicked: {}. \
                         Other appenders continue to function.",
                        registered.name, msg
                    );
                }
                Err(e) => {
                    eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", registered.name, e);
                }
            }
            self.metrics.record_appender_failure();
        }

        if reached > 0 {
            self.metrics.record_delivered();
        }
        Ok(())
    }

    /// Build a message at `level` and log it
    pub fn log_text(&self, level: Level, text: impl Into<String>) -> Result<()> {
        self.log(&LogMessage::new(level, text))
    }

    /// Log with key-value parameters
    pub fn log_with_params(
        &self,
        level: Level,
        text: impl Into<String>,
        params: MessageParams,
    ) -> Result<()> {
        self.log(&LogMessage::new(level, text).with_params(params))
    }

    #[inline]
    pub fn emergency(&self, text: impl Into<String>) -> Result<()> {
        self.log_text(Level::Emergency, text)
    }

    #[inline]
    pub fn alert(&self, text: impl Into<String>) -> Result<()> {
        self.log_text(Level::Alert, text)
    }

    #[inline]
    pub fn critical(&self, text: impl Into<String>) -> Result<()> {
        self.log_text(Level::Critical, text)
    }

    #[inline]
    pub fn error(&self, text: impl Into<String>) -> Result<()> {
        self.log_text(Level::Error, text)
    }

    #[inline]
    pub fn warning(&self, text: impl Into<String>) -> Result<()> {
        self.log_text(Level::Warning, text)
    }

    #[inline]
    pub fn notice(&self, text: impl Into<String>) -> Result<()> {
        self.log_text(Level::Notice, text)
    }

    #[inline]
    pub fn info(&self, text: impl Into<String>) -> Result<()> {
        self.log_text(Level::Info, text)
    }

    #[inline]
    pub fn debug(&self, text: impl Into<String>) -> Result<()> {
        self.log_text(Level::Debug, text)
    }

    #[inline]
    pub fn trace(&self, text: impl Into<String>) -> Result<()> {
        self.log_text(Level::Trace, text)
    }

    /// Register an appender under a unique name
    ///
    /// Registration never overwrites: an existing name fails with
    /// [`LoggerError::DuplicateAppender`] and the registered appender stays
    /// in place. The rejected appender is dropped.
    pub fn set_appender<A>(&self, name: impl Into<String>, appender: A) -> Result<()>
    where
        A: Appender + 'static,
    {
        let name = name.into();
        validate_name(&name)?;

        let mut state = self.state.write();
        state.ensure_open()?;

        if state.appenders.iter().any(|registered| registered.name == name) {
            return Err(LoggerError::duplicate_appender(name));
        }

        state.appenders.push(RegisteredAppender {
            kind: appender.kind().to_string(),
            name,
            appender: Mutex::new(Box::new(appender)),
        });
        Ok(())
    }

    /// Detach an appender and run its shutdown hook
    pub fn remove_appender(&self, name: &str) -> Result<()> {
        let removed = {
            let mut state = self.state.write();
            state.ensure_open()?;

            let position = state
                .appenders
                .iter()
                .position(|registered| registered.name == name)
                .ok_or_else(|| LoggerError::unknown_appender(name))?;
            state.appenders.remove(position)
        };

        let mut appender = removed.appender.into_inner();
        isolate(|| appender.shutdown())
    }

    /// Snapshot of the registered appenders, in registration order
    pub fn get_appenders(&self) -> Vec<AppenderInfo> {
        self.state
            .read()
            .appenders
            .iter()
            .map(|registered| AppenderInfo {
                name: registered.name.clone(),
                kind: registered.kind.clone(),
            })
            .collect()
    }

    pub fn has_appender(&self, name: &str) -> bool {
        self.state
            .read()
            .appenders
            .iter()
            .any(|registered| registered.name == name)
    }

    /// Replace the active mask for subsequent `log` calls
    pub fn set_level(&self, mask: impl Into<LevelMask>) -> Result<()> {
        let mut state = self.state.write();
        state.ensure_open()?;
        state.mask = mask.into();
        Ok(())
    }

    pub fn level(&self) -> LevelMask {
        self.state.read().mask
    }

    pub fn lifecycle(&self) -> LoggerLifecycle {
        let state = self.state.read();
        if state.shut_down {
            LoggerLifecycle::Shutdown
        } else if state.appenders.is_empty() {
            LoggerLifecycle::Unconfigured
        } else {
            LoggerLifecycle::Active
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.state.read().shut_down
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush every appender, returning the first failure
    pub fn flush(&self) -> Result<()> {
        let state = self.state.read();
        state.ensure_open()?;

        let mut first_error = None;
        for registered in &state.appenders {
            let mut appender = registered.appender.lock();
            if let Err(e) = isolate(|| appender.flush()) {
                eprintln!(
                    "[LOGGER ERROR] Appender '{}' flush failed: {}",
                    registered.name, e
                );
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Run every appender's shutdown hook once and close the logger
    ///
    /// Hooks run in registration order. A failing hook does not prevent the
    /// others from running; all failures are returned together in
    /// [`LoggerError::ShutdownFailed`].
    pub fn shutdown(&self) -> Result<()> {
        let mut state = self.state.write();
        state.ensure_open()?;
        state.shut_down = true;

        let mut failures = Vec::new();
        for registered in &state.appenders {
            let mut appender = registered.appender.lock();
            if let Err(e) = isolate(|| appender.shutdown()) {
                failures.push((registered.name.clone(), e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::ShutdownFailed { failures })
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.state.get_mut().shut_down {
            return;
        }

        if let Err(e) = self.shutdown() {
            eprintln!("[LOGGER ERROR] Failed to shut down cleanly: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use severity_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LevelMask::ALL)
///     .appender("console", ConsoleAppender::new())
///     .build()
///     .unwrap();
/// assert_eq!(logger.get_appenders().len(), 1);
/// ```
pub struct LoggerBuilder {
    level: LevelMask,
    appenders: Vec<(String, Box<dyn Appender>)>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            level: LevelMask::ALL,
            appenders: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, mask: impl Into<LevelMask>) -> Self {
        self.level = mask.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, name: impl Into<String>, appender: A) -> Self {
        self.appenders.push((name.into(), Box::new(appender)));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_appender(mut self, name: impl Into<String>, appender: Box<dyn Appender>) -> Self {
        self.appenders.push((name.into(), appender));
        self
    }

    /// Build the Logger, failing on invalid or duplicate appender names
    pub fn build(self) -> Result<Logger> {
        let logger = Logger::with_level(self.level);
        for (name, appender) in self.appenders {
            logger.set_appender(name, appender)?;
        }
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
