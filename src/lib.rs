//! # Severity Logger
//!
//! A severity-filtered logger that fans each message out to a set of named
//! appenders.
//!
//! Severities are single bits, so the logger's filter is a [`LevelMask`]:
//! any combination of levels can be enabled, not just "everything above a
//! threshold".
//!
//! ## Features
//!
//! - **Bitmask filtering**: `Level::Error | Level::Critical` enables exactly those two levels
//! - **Named appenders**: each name is registered once, in order
//! - **Failure isolation**: a failing or panicking appender never stops the others
//! - **Orderly shutdown**: every appender is flushed and closed exactly once
//! - **Queued delivery**: wrap any appender in a bounded worker queue
//!
//! ```
//! use severity_logger::prelude::*;
//!
//! let logger = Logger::with_level(Level::Error | Level::Warning);
//! let memory = MemoryAppender::new();
//! let captured = memory.handle();
//! logger.set_appender("memory", memory).unwrap();
//!
//! logger.error("disk full").unwrap();
//! logger.info("not recorded").unwrap();
//!
//! assert_eq!(captured.texts(), vec!["disk full"]);
//! logger.shutdown().unwrap();
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{
        ConsoleAppender, FileAppender, JsonAppender, MemoryAppender, MemoryHandle, QueuedAppender,
    };
    pub use crate::core::{
        Appender, AppenderInfo, Level, LevelMask, LogMessage, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerLifecycle, LoggerMetrics, MessageParams, OutputFormat, OverflowPolicy,
        Result, TimestampFormat,
    };
}

pub use appenders::{ConsoleAppender, FileAppender, JsonAppender, MemoryAppender, QueuedAppender};
pub use core::{
    Appender, AppenderConfig, AppenderInfo, AppenderTarget, Level, LevelMask, Location,
    LogMessage, LogPriority, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerLifecycle,
    LoggerMetrics, MessageParams, OutputFormat, OverflowCallback, OverflowPolicy, ParamValue,
    QueueConfig, Result, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
