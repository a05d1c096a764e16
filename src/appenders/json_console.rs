//! JSON-lines console appender

use crate::core::appender::Appender;
use crate::core::encode::json_line;
use crate::core::error::Result;
use crate::core::event::LogEvent;
use std::io::Write;

/// Writes one JSON object per line to stdout, in the pipeline wire format.
/// This is the default appender when no configuration is installed.
#[derive(Debug, Default)]
pub struct JsonConsoleAppender;

impl JsonConsoleAppender {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Appender for JsonConsoleAppender {
    fn append(&mut self, event: &LogEvent) -> Result<()> {
        println!("{}", json_line(event));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json-console"
    }
}
