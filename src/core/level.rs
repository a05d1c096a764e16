//! Severity level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log severity with total ordering: `Trace < Debug < Info < Warn < Error`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Numeric severity, `Trace = 0` through `Error = 4`.
    pub fn severity(&self) -> u8 {
        *self as u8
    }

    /// Whether this level passes the given minimum threshold.
    pub fn is_enabled(&self, threshold: Level) -> bool {
        *self >= threshold
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Trace => BrightBlack,
            Level::Debug => Cyan,
            Level::Info => Green,
            Level::Warn => Yellow,
            Level::Error => Red,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
