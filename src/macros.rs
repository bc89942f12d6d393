//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!`, attach the call
//! site (file, line and module path) to the message and hand it to
//! [`Logger::log`](crate::Logger::log). Each one evaluates to the
//! `Result` returned by the logger.
//!
//! # Examples
//!
//! ```
//! use severity_logger::prelude::*;
//! use severity_logger::info;
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use severity_logger::prelude::*;
/// use severity_logger::log;
///
/// let logger = Logger::new();
/// let memory = MemoryAppender::new();
/// let captured = memory.handle();
/// logger.set_appender("memory", memory).unwrap();
///
/// log!(logger, Level::Error, "Error code: {}", 500).unwrap();
///
/// let message = &captured.messages()[0];
/// assert_eq!(message.text(), "Error code: 500");
/// assert!(message.location().is_some());
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log(
            &$crate::LogMessage::new($level, format!($($arg)+))
                .with_location(file!(), line!(), module_path!()),
        )
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Emergency, $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Alert, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// # use severity_logger::prelude::*;
/// # let logger = Logger::new();
/// use severity_logger::critical;
/// critical!(logger, "Replica {} unreachable", 3).unwrap();
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use severity_logger::prelude::*;
/// # let logger = Logger::new();
/// use severity_logger::error;
/// error!(logger, "Connection failed").unwrap();
/// error!(logger, "Failed to open file: {}", "config.toml").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use severity_logger::prelude::*;
/// # let logger = Logger::new();
/// use severity_logger::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5).unwrap();
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Notice, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use severity_logger::prelude::*;
/// # let logger = Logger::new();
/// use severity_logger::info;
/// info!(logger, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemoryAppender;
    use crate::core::{Level, Logger, Result};

    #[test]
    fn test_macros_format_and_filter() -> Result<()> {
        let logger = Logger::with_level(Level::Error | Level::Debug);
        let memory = MemoryAppender::new();
        let captured = memory.handle();
        logger.set_appender("memory", memory)?;

        crate::error!(logger, "code {}", 7)?;
        crate::info!(logger, "filtered")?;
        crate::debug!(logger, "{} + {} = {}", 1, 1, 2)?;
        crate::emergency!(logger, "filtered too")?;

        assert_eq!(captured.texts(), vec!["code 7", "1 + 1 = 2"]);
        assert_eq!(captured.levels(), vec![Level::Error, Level::Debug]);
        Ok(())
    }

    #[test]
    fn test_macro_records_call_site() -> Result<()> {
        let logger = Logger::new();
        let memory = MemoryAppender::new();
        let captured = memory.handle();
        logger.set_appender("memory", memory)?;

        crate::warning!(logger, "here")?;

        let message = &captured.messages()[0];
        let location = message.location().expect("macro attaches a location");
        assert!(location.file.ends_with("macros.rs"));
        assert!(location.module_path.contains("macros"));
        Ok(())
    }
}
