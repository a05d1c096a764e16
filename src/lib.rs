//! Structured event-logging pipeline
//!
//! Events flow from named loggers through a severity gate (with per-package
//! overrides and sampling of low-severity events), pick up scoped ambient
//! context, and fan out to configurable appenders: console, JSON lines,
//! plain and size-rotated files, composites, and an asynchronous wrapper
//! with a bounded queue.
//!
//! # Quick start
//!
//! ```
//! use lumber::appenders::ConsoleAppender;
//! use lumber::core::{config, shared, Level, LogConfig, LogContext};
//!
//! config::configure(
//!     LogConfig::builder()
//!         .min_level(Level::Debug)
//!         .package_level("app.db", Level::Warn)
//!         .appender(shared(ConsoleAppender::new()))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let log = lumber::logger("app.auth");
//! LogContext::bind("request_id", "r-7").run(|| {
//!     log.info("user logged in").field("user_id", 42).emit();
//! });
//!
//! config::reset();
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub use crate::core::config::{self as config, configure};
pub use crate::core::logger::logger;

/// Common imports for pipeline users.
pub mod prelude {
    pub use crate::appenders::{
        AsyncAppender, CompositeAppender, ConsoleAppender, FileAppender, JsonConsoleAppender,
        OverflowPolicy, RollingFileAppender,
    };
    pub use crate::core::{
        configure, logger, shared, Appender, FieldMap, FieldValue, Level, LogConfig, LogContext,
        LogEvent, LoggerError, Result, SharedAppender,
    };
}
