//! Core pipeline types: events, levels, context, configuration, and the
//! appender abstraction.

pub mod appender;
pub mod config;
pub mod context;
pub mod encode;
pub mod error;
pub mod event;
pub mod field;
pub mod level;
pub mod logger;

pub use appender::{shared, Appender, SharedAppender};
pub use config::{configure, LogConfig, LogConfigBuilder};
pub use context::{InheritedContext, LogContext};
pub use error::{LoggerError, Result};
pub use event::LogEvent;
pub use field::{FieldMap, FieldValue};
pub use level::Level;
pub use logger::{logger, reset_registry, EventBuilder, Logger};
