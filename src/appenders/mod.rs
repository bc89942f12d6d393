//! Appender implementations

pub mod console;
pub mod file;
pub mod json;
pub mod memory;
pub mod queued;

pub use console::ConsoleAppender;
pub use file::FileAppender;
pub use json::JsonAppender;
pub use memory::{CapturedMessage, MemoryAppender, MemoryHandle};
pub use queued::QueuedAppender;

pub use crate::core::Appender;
