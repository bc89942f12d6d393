//! Appender trait for log output destinations

use super::{error::Result, message::LogMessage};

/// A sink the logger fans accepted messages out to
///
/// The logger owns its appenders and calls them one at a time, so
/// implementations only need `Send`.
pub trait Appender: Send {
    fn append(&mut self, message: &LogMessage) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Orderly flush/close, called exactly once when the appender is retired
    fn shutdown(&mut self) -> Result<()> {
        self.flush()
    }

    /// Short description used in appender listings
    fn kind(&self) -> &str;
}

impl<A: Appender + ?Sized> Appender for Box<A> {
    fn append(&mut self, message: &LogMessage) -> Result<()> {
        (**self).append(message)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn shutdown(&mut self) -> Result<()> {
        (**self).shutdown()
    }

    fn kind(&self) -> &str {
        (**self).kind()
    }
}
