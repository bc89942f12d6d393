//! What a [`QueuedAppender`](crate::appenders::QueuedAppender) does with a
//! message that arrives while its queue is at capacity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Full-queue handling for non-critical messages
///
/// Critical-priority messages ignore the policy and always wait.
/// The serde form is also what `Display` prints, so a policy read from a
/// config file is reported back in the same spelling.
///
/// ```
/// use severity_logger::OverflowPolicy;
/// use std::time::Duration;
///
/// assert_eq!(OverflowPolicy::default(), OverflowPolicy::AlertAndDrop);
///
/// let bounded_wait = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// assert_eq!(bounded_wait.to_string(), "block_with_timeout(100ms)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Discard the message; only `queue_dropped` records it
    DropNewest,

    /// Wait for the worker to make room. The logging thread stalls meanwhile.
    Block,

    /// Wait up to the given time, then discard with an alert
    BlockWithTimeout(Duration),

    /// Discard the message, warn on stderr and invoke the overflow callback
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => f.write_str("drop_newest"),
            OverflowPolicy::Block => f.write_str("block"),
            OverflowPolicy::BlockWithTimeout(wait) => write!(f, "block_with_timeout({:?})", wait),
            OverflowPolicy::AlertAndDrop => f.write_str("alert_and_drop"),
        }
    }
}

/// How hard a queued appender tries to keep a message, derived from its level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogPriority {
    /// Info, Debug and Trace
    #[default]
    Normal,
    /// Warning and Notice
    High,
    /// Emergency through Error; never dropped
    Critical,
}

impl fmt::Display for LogPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogPriority::Normal => "normal",
            LogPriority::High => "high",
            LogPriority::Critical => "critical",
        })
    }
}

/// Receives the running total of dropped messages
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_config_spelling() {
        for policy in [
            OverflowPolicy::DropNewest,
            OverflowPolicy::Block,
            OverflowPolicy::AlertAndDrop,
        ] {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{}\"", policy));
        }
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "block_with_timeout(100ms)"
        );
    }

    #[test]
    fn test_policy_from_json() {
        let policy: OverflowPolicy = serde_json::from_str("\"block\"").unwrap();
        assert_eq!(policy, OverflowPolicy::Block);

        let policy: OverflowPolicy =
            serde_json::from_str(r#"{"block_with_timeout":{"secs":0,"nanos":5000000}}"#).unwrap();
        assert_eq!(policy, OverflowPolicy::BlockWithTimeout(Duration::from_millis(5)));

        assert!(serde_json::from_str::<OverflowPolicy>("\"drop_oldest\"").is_err());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(LogPriority::Normal < LogPriority::High);
        assert!(LogPriority::High < LogPriority::Critical);
        assert_eq!(LogPriority::Critical.to_string(), "critical");
    }
}
