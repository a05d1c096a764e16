//! Appender trait and shared handle type

use super::error::Result;
use super::event::LogEvent;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

/// Destination for log events.
///
/// Implementations receive fully-built immutable events and are responsible
/// for formatting and delivery. `append` reports failure through `Result`;
/// callers that fan out to several appenders additionally isolate panics so
/// one faulty destination cannot take down the rest.
pub trait Appender: Send + Sync {
    /// Write a single event to this destination.
    fn append(&mut self, event: &LogEvent) -> Result<()>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<()>;

    /// Short identifier used in diagnostic messages.
    fn name(&self) -> &str;
}

/// Shared, lockable handle to an appender.
pub type SharedAppender = Arc<Mutex<dyn Appender>>;

/// Wrap a concrete appender into a [`SharedAppender`].
pub fn shared<A: Appender + 'static>(appender: A) -> SharedAppender {
    Arc::new(Mutex::new(appender))
}

/// Extract a printable message from a caught panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
