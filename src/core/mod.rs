//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod format;
pub mod level;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod overflow_policy;
pub mod params;

pub use appender::Appender;
pub use config::{AppenderConfig, AppenderTarget, LoggerConfig, QueueConfig};
pub use error::{LoggerError, Result};
pub use format::{OutputFormat, TimestampFormat};
pub use level::{Level, LevelMask};
pub use logger::{AppenderInfo, Logger, LoggerBuilder, LoggerLifecycle, DEFAULT_SHUTDOWN_TIMEOUT};
pub use message::{Location, LogMessage};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{LogPriority, OverflowCallback, OverflowPolicy};
pub use params::{MessageParams, ParamValue};
