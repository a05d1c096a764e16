//! Convenience emission macros
//!
//! Thin wrappers over [`Logger::log`](crate::core::logger::Logger::log) with
//! `format!`-style messages. Fields still go through the builder:
//!
//! ```
//! use lumber::{info, logger};
//!
//! let log = logger("app.web");
//! info!(log, "listening on port {}", 8080);
//! log.info("request handled").field("status", 200).emit();
//! ```

/// Emit at an explicit level with a formatted message.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+)).emit()
    };
}

/// Emit a `Trace` event with a formatted message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::level::Level::Trace, $($arg)+)
    };
}

/// Emit a `Debug` event with a formatted message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::level::Level::Debug, $($arg)+)
    };
}

/// Emit an `Info` event with a formatted message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::level::Level::Info, $($arg)+)
    };
}

/// Emit a `Warn` event with a formatted message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::level::Level::Warn, $($arg)+)
    };
}

/// Emit an `Error` event with a formatted message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::level::Level::Error, $($arg)+)
    };
}
