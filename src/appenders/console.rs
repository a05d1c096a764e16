//! Human-readable console appender

use crate::core::appender::Appender;
use crate::core::error::Result;
use crate::core::event::LogEvent;
use crate::core::field::FieldValue;
use colored::Colorize;
use std::fmt::Write as _;
use std::io::Write;

/// Writes events to stdout in a compact human-readable form:
///
/// ```text
/// [14:30:45.123] [INFO ] [app.auth] user logged in user_id=42 _request_id="r-9"
/// ```
///
/// Intended for development; production pipelines usually prefer
/// [`JsonConsoleAppender`](crate::appenders::JsonConsoleAppender).
pub struct ConsoleAppender {
    use_colors: bool,
}

impl ConsoleAppender {
    /// Plain output without ANSI colors.
    #[must_use]
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    /// Enable or disable colored level names.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn format_event(&self, event: &LogEvent) -> String {
        let timestamp = event
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S%.3f");

        let padded = format!("{:5}", event.level.to_str());
        let level = if self.use_colors {
            padded.as_str().color(event.level.color_code()).to_string()
        } else {
            padded
        };

        let mut line = format!(
            "[{}] [{}] [{}] {}",
            timestamp, level, event.logger_name, event.message
        );

        for (key, value) in event.fields.iter() {
            match value {
                FieldValue::String(s) => {
                    let _ = write!(line, " {}={:?}", key, s);
                }
                other => {
                    let _ = write!(line, " {}={}", key, other);
                }
            }
        }
        for (key, value) in &event.context {
            let _ = write!(line, " _{}={:?}", key, value);
        }
        line
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, event: &LogEvent) -> Result<()> {
        println!("{}", self.format_event(event));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
