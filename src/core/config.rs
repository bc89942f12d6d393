//! Declarative logger configuration
//!
//! A [`LoggerConfig`] describes the level mask and the appenders of a
//! logger. It is usually loaded from JSON at startup:
//!
//! ```json
//! {
//!   "level": "EMERGENCY | ALERT | CRITICAL | ERROR",
//!   "appenders": [
//!     { "name": "stderr", "type": "console", "colors": false },
//!     { "name": "file", "type": "file", "path": "/var/log/app.log",
//!       "queue": { "capacity": 1024, "overflow": "block" } }
//!   ]
//! }
//! ```

use super::appender::Appender;
use super::error::{LoggerError, Result};
use super::format::{OutputFormat, TimestampFormat};
use super::level::LevelMask;
use super::logger::{Logger, LoggerBuilder};
use super::overflow_policy::OverflowPolicy;
use crate::appenders::{ConsoleAppender, FileAppender, JsonAppender, QueuedAppender};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    #[serde(default)]
    pub level: LevelMask,
    #[serde(default)]
    pub appenders: Vec<AppenderConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppenderConfig {
    pub name: String,
    #[serde(flatten)]
    pub target: AppenderTarget,
    /// Run the appender on a worker thread behind a bounded queue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppenderTarget {
    Console {
        #[serde(default = "default_true")]
        colors: bool,
        #[serde(default)]
        format: OutputFormat,
        #[serde(default)]
        timestamp: TimestampFormat,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        lock: bool,
        #[serde(default)]
        format: OutputFormat,
        #[serde(default)]
        timestamp: TimestampFormat,
    },
    Json {
        path: PathBuf,
        #[serde(default)]
        pretty: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub capacity: usize,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown_timeout_ms: Option<u64>,
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading logger config", path.display().to_string(), e)
        })?;
        Self::from_json_str(&json)
    }

    /// Reject settings that can never produce a working logger
    pub fn validate(&self) -> Result<()> {
        for appender in &self.appenders {
            if let AppenderTarget::Console { timestamp, .. } | AppenderTarget::File { timestamp, .. } =
                &appender.target
            {
                timestamp.validate().map_err(|e| {
                    LoggerError::config(format!("appender '{}'", appender.name), e.to_string())
                })?;
            }

            if let Some(queue) = &appender.queue {
                if queue.capacity == 0 {
                    return Err(LoggerError::config(
                        format!("appender '{}'", appender.name),
                        "queue capacity must be at least 1",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Open every appender and assemble the logger
    ///
    /// Duplicate names surface as [`LoggerError::DuplicateAppender`].
    pub fn build(&self) -> Result<Logger> {
        self.validate()?;

        let mut builder = LoggerBuilder::new().level(self.level);
        for appender in &self.appenders {
            builder = builder.boxed_appender(appender.name.clone(), appender.open()?);
        }
        builder.build()
    }
}

impl AppenderConfig {
    fn open(&self) -> Result<Box<dyn Appender>> {
        let appender: Box<dyn Appender> = match &self.target {
            AppenderTarget::Console {
                colors,
                format,
                timestamp,
            } => Box::new(
                ConsoleAppender::with_colors(*colors)
                    .with_output_format(format.clone())
                    .with_timestamp_format(timestamp.clone()),
            ),
            AppenderTarget::File {
                path,
                lock,
                format,
                timestamp,
            } => Box::new(
                open_file(&self.name, path, *lock)?
                    .with_output_format(format.clone())
                    .with_timestamp_format(timestamp.clone()),
            ),
            AppenderTarget::Json { path, pretty } => {
                Box::new(JsonAppender::new(path)?.pretty(*pretty))
            }
        };

        Ok(match &self.queue {
            Some(queue) => {
                let mut queued = QueuedAppender::new(appender, queue.capacity)
                    .with_overflow_policy(queue.overflow.clone());
                if let Some(ms) = queue.shutdown_timeout_ms {
                    queued = queued.with_shutdown_timeout(Duration::from_millis(ms));
                }
                Box::new(queued)
            }
            None => appender,
        })
    }
}

#[cfg(feature = "file")]
fn open_file(_name: &str, path: &Path, lock: bool) -> Result<FileAppender> {
    if lock {
        FileAppender::locked(path)
    } else {
        FileAppender::new(path)
    }
}

#[cfg(not(feature = "file"))]
fn open_file(name: &str, path: &Path, lock: bool) -> Result<FileAppender> {
    if lock {
        return Err(LoggerError::config(
            format!("appender '{}'", name),
            "file locking requires the `file` feature",
        ));
    }
    FileAppender::new(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_config() -> Result<()> {
        let config = LoggerConfig::from_json_str(
            r#"{
                "level": "ERROR | CRITICAL",
                "appenders": [
                    { "name": "stderr", "type": "console", "colors": false, "format": "logfmt" },
                    { "name": "file", "type": "file", "path": "/tmp/app.log",
                      "queue": { "capacity": 16, "overflow": "block" } },
                    { "name": "events", "type": "json", "path": "/tmp/app.jsonl", "pretty": true }
                ]
            }"#,
        )?;

        assert_eq!(config.level, Level::Error | Level::Critical);
        assert_eq!(config.appenders.len(), 3);
        assert_eq!(
            config.appenders[0].target,
            AppenderTarget::Console {
                colors: false,
                format: OutputFormat::Logfmt,
                timestamp: TimestampFormat::Iso8601,
            }
        );
        let queue = config.appenders[1].queue.as_ref().unwrap();
        assert_eq!(queue.capacity, 16);
        assert_eq!(queue.overflow, OverflowPolicy::Block);
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config = LoggerConfig::from_json_str("{}")?;
        assert_eq!(config.level, LevelMask::ALL);
        assert!(config.appenders.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let result = LoggerConfig::from_json_str(r#"{ "level": "ERROR | LOUD" }"#);
        assert!(matches!(result, Err(LoggerError::JsonError(_))));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = LoggerConfig::from_json_str(
            r#"{ "appenders": [ { "name": "c", "type": "console", "queue": { "capacity": 0 } } ] }"#,
        );
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_unknown_timestamp_specifier_is_rejected() {
        let result = LoggerConfig::from_json_str(
            r#"{ "appenders": [ { "name": "c", "type": "console", "timestamp": { "custom": "%Q" } } ] }"#,
        );
        match result {
            Err(LoggerError::InvalidConfiguration { component, message }) => {
                assert_eq!(component, "appender 'c'");
                assert!(message.contains("%Q"));
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }

        let valid = LoggerConfig::from_json_str(
            r#"{ "appenders": [ { "name": "c", "type": "console", "timestamp": { "custom": "%H:%M" } } ] }"#,
        );
        assert!(valid.is_ok());
    }

    #[test]
    fn test_build_revalidates_hand_built_config() {
        let config = LoggerConfig {
            level: LevelMask::ALL,
            appenders: vec![AppenderConfig {
                name: "c".to_string(),
                target: AppenderTarget::Console {
                    colors: false,
                    format: OutputFormat::Text,
                    timestamp: TimestampFormat::Custom("%Q".to_string()),
                },
                queue: None,
            }],
        };

        assert!(matches!(
            config.build(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_build_and_log() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("configured.log");

        let config = LoggerConfig {
            level: Level::Error | Level::Critical,
            appenders: vec![AppenderConfig {
                name: "file".to_string(),
                target: AppenderTarget::File {
                    path: log_path.clone(),
                    lock: false,
                    format: OutputFormat::Text,
                    timestamp: TimestampFormat::Iso8601,
                },
                queue: Some(QueueConfig {
                    capacity: 8,
                    overflow: OverflowPolicy::Block,
                    shutdown_timeout_ms: Some(2_000),
                }),
            }],
        };

        let logger = config.build()?;
        assert_eq!(logger.get_appenders()[0].kind, "queued file");

        logger.warning("filtered out")?;
        logger.error("written")?;
        logger.shutdown()?;

        let content = fs::read_to_string(&log_path)?;
        assert!(content.contains("written"));
        assert!(!content.contains("filtered out"));
        Ok(())
    }

    #[test]
    fn test_build_rejects_duplicate_names() -> Result<()> {
        let config = LoggerConfig::from_json_str(
            r#"{ "appenders": [
                { "name": "out", "type": "console" },
                { "name": "out", "type": "console" }
            ] }"#,
        )?;

        assert!(matches!(
            config.build(),
            Err(LoggerError::DuplicateAppender { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_from_file() -> Result<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("logger.json");
        fs::write(&config_path, r#"{ "level": "ALL" }"#)?;

        let config = LoggerConfig::from_file(&config_path)?;
        assert_eq!(config.level, LevelMask::ALL);

        let missing = LoggerConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(LoggerError::IoOperation { .. })));
        Ok(())
    }
}
