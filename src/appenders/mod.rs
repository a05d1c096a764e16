//! Appender implementations: console, file, composite fan-out, background
//! delivery, and size-based rotation.

pub mod async_appender;
pub mod composite;
pub mod console;
pub mod file;
pub mod json_console;
pub mod rolling_file;

pub use async_appender::{
    AsyncAppender, AsyncState, OverflowPolicy, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use composite::CompositeAppender;
pub use console::ConsoleAppender;
pub use file::FileAppender;
pub use json_console::JsonConsoleAppender;
pub use rolling_file::{RollingFileAppender, ROLL_TIMESTAMP_FORMAT};
