//! File appender implementation

use crate::core::{Appender, LogMessage, LoggerError, OutputFormat, Result, TimestampFormat};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
    locked: bool,
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            LoggerError::io_operation(
                "creating log directory",
                parent.display().to_string(),
                e,
            )
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::io_operation("opening log file", path.display().to_string(), e))
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
            locked: false,
        })
    }

    /// Open the file holding an exclusive advisory lock until shutdown
    ///
    /// Fails with [`LoggerError::FileLockError`] when another handle already
    /// holds the lock.
    #[cfg(feature = "file")]
    pub fn locked(path: impl Into<PathBuf>) -> Result<Self> {
        use fs2::FileExt;

        let path = path.into();
        let file = open_append(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| LoggerError::file_lock(path.display().to_string()))?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
            locked: true,
        })
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use severity_logger::appenders::FileAppender;
    /// use severity_logger::TimestampFormat;
    ///
    /// let appender = FileAppender::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Appender for FileAppender {
    fn append(&mut self, message: &LogMessage) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::other(format!("File appender for '{}' is closed", self.path.display()))
        })?;

        let mut output = self.output_format.format(message, &self.timestamp_format)?;
        output.push('\n');

        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    /// Flush, release the lock if held and close the file
    fn shutdown(&mut self) -> Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        writer.flush()?;

        #[cfg(feature = "file")]
        {
            if self.locked {
                fs2::FileExt::unlock(writer.get_ref())?;
                self.locked = false;
            }
        }

        Ok(())
    }

    fn kind(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
