//! Console appender implementation

use crate::core::{Appender, LogMessage, OutputFormat, Result, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_colors(cfg!(feature = "console"))
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use severity_logger::appenders::ConsoleAppender;
    /// use severity_logger::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Render a message the way `append` prints it
    pub fn render(&self, message: &LogMessage) -> Result<String> {
        match self.output_format {
            OutputFormat::Text if self.use_colors => self.format_colored(message),
            _ => self.output_format.format(message, &self.timestamp_format),
        }
    }

    #[cfg(feature = "console")]
    fn format_colored(&self, message: &LogMessage) -> Result<String> {
        let level_str = format!("{:9}", message.level().to_str())
            .color(message.level().color_code())
            .to_string();

        let base = format!(
            "[{}] [{}] {} - {}",
            self.timestamp_format.format(message.timestamp())?,
            level_str,
            message.thread_label(),
            message.text()
        );

        Ok(if message.params().is_empty() {
            base
        } else {
            format!("{} {}", base, message.params().format_fields())
        })
    }

    #[cfg(not(feature = "console"))]
    fn format_colored(&self, message: &LogMessage) -> Result<String> {
        self.output_format.format(message, &self.timestamp_format)
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, message: &LogMessage) -> Result<()> {
        let output = self.render(message)?;

        // Emergency..Error go to stderr, the rest to stdout
        if message.level().is_error_stream() {
            eprintln!("{}", output);
        } else {
            println!("{}", output);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn kind(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;

    #[test]
    fn test_plain_render() {
        let appender = ConsoleAppender::with_colors(false);
        let rendered = appender
            .render(&LogMessage::new(Level::Alert, "pager fired"))
            .unwrap();
        assert!(rendered.contains("[ALERT    ]"));
        assert!(rendered.ends_with("pager fired"));
    }

    #[test]
    fn test_json_render_ignores_colors() {
        let appender = ConsoleAppender::with_colors(true).with_output_format(OutputFormat::Json);
        let rendered = appender
            .render(&LogMessage::new(Level::Info, "ready"))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["level"], "INFO");
    }

    #[test]
    fn test_append_and_shutdown() -> Result<()> {
        let mut appender = ConsoleAppender::with_colors(false);
        appender.append(&LogMessage::new(Level::Error, "to stderr"))?;
        appender.append(&LogMessage::new(Level::Debug, "to stdout"))?;
        appender.shutdown()
    }

    #[test]
    fn test_bad_timestamp_pattern_fails_append() {
        let mut appender = ConsoleAppender::with_colors(true)
            .with_timestamp_format(TimestampFormat::Custom("%Q".to_string()));
        assert!(appender.append(&LogMessage::new(Level::Error, "boom")).is_err());
    }
}
