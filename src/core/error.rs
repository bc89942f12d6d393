//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// An appender is already registered under this name
    #[error("Appender '{name}' is already registered")]
    DuplicateAppender { name: String },

    /// No appender is registered under this name
    #[error("No appender registered under '{name}'")]
    UnknownAppender { name: String },

    /// Appender names must be non-empty
    #[error("Invalid appender name: {reason}")]
    InvalidAppenderName { reason: String },

    /// Logger has been shut down
    #[error("Logger has been shut down")]
    LoggerClosed,

    /// One or more appender shutdown hooks failed
    #[error("Shutdown failed for {} appender(s): {}", failures.len(), format_failures(failures))]
    ShutdownFailed { failures: Vec<(String, LoggerError)> },

    /// Severity name or mask expression could not be parsed
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// Queued appender worker is gone
    #[error("Failed to send log message to queue worker")]
    ChannelSendError,

    /// Queued appender did not drain in time
    #[error("Queue worker did not finish within {timeout_ms}ms")]
    ShutdownTimeout { timeout_ms: u64 },

    /// Appender panicked while handling a call
    #[error("Appender panicked: {0}")]
    AppenderPanicked(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn format_failures(failures: &[(String, LoggerError)]) -> String {
    failures
        .iter()
        .map(|(name, err)| format!("{}: {}", name, err))
        .collect::<Vec<_>>()
        .join("; ")
}

impl LoggerError {
    /// Create a duplicate appender error
    pub fn duplicate_appender(name: impl Into<String>) -> Self {
        LoggerError::DuplicateAppender { name: name.into() }
    }

    /// Create an unknown appender error
    pub fn unknown_appender(name: impl Into<String>) -> Self {
        LoggerError::UnknownAppender { name: name.into() }
    }

    /// Create an invalid appender name error
    pub fn invalid_appender_name(reason: impl Into<String>) -> Self {
        LoggerError::InvalidAppenderName {
            reason: reason.into(),
        }
    }

    /// Create an invalid level error
    pub fn invalid_level(input: impl Into<String>) -> Self {
        LoggerError::InvalidLevel(input.into())
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::duplicate_appender("file");
        assert!(matches!(err, LoggerError::DuplicateAppender { .. }));

        let err = LoggerError::config("FileAppender", "Invalid path");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::invalid_level("LOUD");
        assert!(matches!(err, LoggerError::InvalidLevel(_)));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::duplicate_appender("file");
        assert_eq!(err.to_string(), "Appender 'file' is already registered");

        let err = LoggerError::unknown_appender("syslog");
        assert_eq!(err.to_string(), "No appender registered under 'syslog'");

        assert_eq!(
            LoggerError::LoggerClosed.to_string(),
            "Logger has been shut down"
        );
    }

    #[test]
    fn test_shutdown_failed_lists_every_appender() {
        let err = LoggerError::ShutdownFailed {
            failures: vec![
                ("file".to_string(), LoggerError::other("disk full")),
                ("net".to_string(), LoggerError::ChannelSendError),
            ],
        };

        let text = err.to_string();
        assert!(text.starts_with("Shutdown failed for 2 appender(s)"));
        assert!(text.contains("file: disk full"));
        assert!(text.contains("net: Failed to send"));
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "cannot open", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("cannot open"));
    }
}
