//! Severity levels and level masks
//!
//! Each [`Level`] is a distinct power of two. Levels combine with `|` into a
//! [`LevelMask`], and a logger accepts a message when the message level
//! intersects its mask. Masks need not be contiguous: `ERROR | TRACE` is a
//! valid configuration that skips everything in between.

use super::error::LoggerError;
use super::overflow_policy::LogPriority;
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u32)]
pub enum Level {
    /// System is unusable
    Emergency = 1,
    /// Action must be taken immediately
    Alert = 2,
    Critical = 4,
    Error = 8,
    Warning = 16,
    /// Normal but significant condition
    Notice = 32,
    #[default]
    Info = 64,
    Debug = 128,
    /// Verbose debugging output
    Trace = 256,
}

impl Level {
    /// Same as [`Level::Emergency`]
    pub const FATAL: Level = Level::Emergency;

    /// Same as [`Level::Warning`]
    pub const WARN: Level = Level::Warning;

    /// Every level, most severe first
    pub const VARIANTS: [Level; 9] = [
        Level::Emergency,
        Level::Alert,
        Level::Critical,
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Look up the level with exactly these bits
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::VARIANTS.into_iter().find(|level| level.bits() == bits)
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Emergency => "EMERGENCY",
            Level::Alert => "ALERT",
            Level::Critical => "CRITICAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Notice => "NOTICE",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    /// Priority used when a queue overflows
    pub fn priority(&self) -> LogPriority {
        match self {
            Level::Emergency | Level::Alert | Level::Critical | Level::Error => {
                LogPriority::Critical
            }
            Level::Warning | Level::Notice => LogPriority::High,
            Level::Info | Level::Debug | Level::Trace => LogPriority::Normal,
        }
    }

    /// Whether console output for this level goes to stderr
    pub fn is_error_stream(&self) -> bool {
        self.priority() == LogPriority::Critical
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Emergency | Level::Alert => BrightRed,
            Level::Critical | Level::Error => Red,
            Level::Warning => Yellow,
            Level::Notice => Cyan,
            Level::Info => Green,
            Level::Debug => Blue,
            Level::Trace => BrightBlack,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EMERGENCY" | "FATAL" => Ok(Level::Emergency),
            "ALERT" => Ok(Level::Alert),
            "CRITICAL" => Ok(Level::Critical),
            "ERROR" => Ok(Level::Error),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "NOTICE" => Ok(Level::Notice),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

bitflags! {
    /// Set of accepted severities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LevelMask: u32 {
        const EMERGENCY = Level::Emergency.bits();
        const FATAL = Level::FATAL.bits();
        const ALERT = Level::Alert.bits();
        const CRITICAL = Level::Critical.bits();
        const ERROR = Level::Error.bits();
        const WARNING = Level::Warning.bits();
        const WARN = Level::WARN.bits();
        const NOTICE = Level::Notice.bits();
        const INFO = Level::Info.bits();
        const DEBUG = Level::Debug.bits();
        const TRACE = Level::Trace.bits();
        /// 2^32 - 1, matches every level
        const ALL = u32::MAX;
    }
}

impl LevelMask {
    /// True when the level intersects this mask
    #[inline]
    pub fn matches(&self, level: Level) -> bool {
        self.bits() & level.bits() != 0
    }

    /// The canonical levels contained in this mask, most severe first
    pub fn levels(&self) -> Vec<Level> {
        Level::VARIANTS
            .into_iter()
            .filter(|level| self.matches(*level))
            .collect()
    }
}

impl Default for LevelMask {
    fn default() -> Self {
        LevelMask::ALL
    }
}

impl From<Level> for LevelMask {
    fn from(level: Level) -> Self {
        LevelMask::from_bits_retain(level.bits())
    }
}

impl BitOr for Level {
    type Output = LevelMask;

    fn bitor(self, rhs: Level) -> LevelMask {
        LevelMask::from(self) | LevelMask::from(rhs)
    }
}

impl BitOr<Level> for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: Level) -> LevelMask {
        self | LevelMask::from(rhs)
    }
}

impl fmt::Display for LevelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == LevelMask::ALL {
            return write!(f, "ALL");
        }
        if self.is_empty() {
            return write!(f, "NONE");
        }

        let mut parts = Vec::new();
        let mut remaining = self.bits();
        for level in Level::VARIANTS {
            if remaining & level.bits() != 0 {
                parts.push(level.to_str().to_string());
                remaining &= !level.bits();
            }
        }
        if remaining != 0 {
            parts.push(format!("{:#x}", remaining));
        }

        write!(f, "{}", parts.join(" | "))
    }
}

impl FromStr for LevelMask {
    type Err = LoggerError;

    /// Parse `"ERROR | CRITICAL"`, `"ALL"`, `"NONE"`, `"12"` or `"0xc"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = LevelMask::empty();

        for token in s.split('|') {
            let token = token.trim();
            let upper = token.to_uppercase();

            let bits = match upper.as_str() {
                "" => return Err(LoggerError::invalid_level(s)),
                "ALL" => u32::MAX,
                "NONE" => 0,
                _ => {
                    if let Some(hex) = upper.strip_prefix("0X") {
                        u32::from_str_radix(hex, 16).map_err(|_| LoggerError::invalid_level(s))?
                    } else if upper.chars().all(|c| c.is_ascii_digit()) {
                        upper.parse::<u32>().map_err(|_| LoggerError::invalid_level(s))?
                    } else {
                        token
                            .parse::<Level>()
                            .map_err(|_| LoggerError::invalid_level(s))?
                            .bits()
                    }
                }
            };

            mask |= LevelMask::from_bits_retain(bits);
        }

        Ok(mask)
    }
}

impl Serialize for LevelMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LevelMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
