//! Pipeline configuration and the process-wide active configuration
//!
//! A [`LogConfig`] bundles the minimum severity, per-package overrides, the
//! sampling rate for low-severity events, and the appender set. Configs are
//! immutable once built; runtime reconfiguration swaps the whole config
//! atomically via [`configure`], and emissions in flight keep the config they
//! started with.

use super::appender::SharedAppender;
use super::error::{LoggerError, Result};
use super::level::Level;
use crate::appenders::JsonConsoleAppender;
use parking_lot::RwLock;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

static CONFIG: RwLock<Option<Arc<LogConfig>>> = RwLock::new(None);

/// Immutable pipeline configuration.
pub struct LogConfig {
    min_level: Level,
    appenders: Vec<SharedAppender>,
    sampling_rate: f64,
    package_levels: HashMap<String, Level>,
}

impl LogConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder::new()
    }

    /// Global minimum level, before package overrides.
    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn appenders(&self) -> &[SharedAppender] {
        &self.appenders
    }

    /// Threshold for a dotted source name.
    ///
    /// An exact package match wins; otherwise the longest dotted-prefix
    /// override applies (`app.db` covers `app.db.pool` but `app` does not
    /// override it). Sources with no matching override use the global minimum.
    pub fn effective_level(&self, source: &str) -> Level {
        if let Some(level) = self.package_levels.get(source) {
            return *level;
        }
        let mut prefix = source;
        while let Some(idx) = prefix.rfind('.') {
            prefix = &prefix[..idx];
            if let Some(level) = self.package_levels.get(prefix) {
                return *level;
            }
        }
        self.min_level
    }

    /// Whether an emission from `source` at `level` passes the gate.
    ///
    /// The severity threshold applies first. Events that pass it are then
    /// subject to sampling, which only ever discards `Trace` and `Debug`
    /// events; `Info` and above are never sampled away. A rate of 1.0 keeps
    /// everything and a rate of 0.0 drops every sampleable event.
    pub fn is_enabled(&self, source: &str, level: Level) -> bool {
        if !level.is_enabled(self.effective_level(source)) {
            return false;
        }
        if level <= Level::Debug && self.sampling_rate < 1.0 {
            return rand::thread_rng().gen::<f64>() < self.sampling_rate;
        }
        true
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            min_level: Level::Info,
            appenders: vec![super::appender::shared(JsonConsoleAppender::new())],
            sampling_rate: 1.0,
            package_levels: HashMap::new(),
        }
    }
}

/// Builder for [`LogConfig`].
///
/// ```
/// use lumber::core::config::LogConfig;
/// use lumber::core::level::Level;
///
/// let config = LogConfig::builder()
///     .min_level(Level::Debug)
///     .package_level("app.db", Level::Warn)
///     .sampling_rate(0.25)
///     .build()
///     .unwrap();
/// assert_eq!(config.effective_level("app.db.pool"), Level::Warn);
/// ```
#[derive(Default)]
pub struct LogConfigBuilder {
    min_level: Option<Level>,
    appenders: Vec<SharedAppender>,
    sampling_rate: Option<f64>,
    package_levels: HashMap<String, Level>,
}

impl LogConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Add an appender to the fan-out set.
    #[must_use]
    pub fn appender(mut self, appender: SharedAppender) -> Self {
        self.appenders.push(appender);
        self
    }

    /// Probability in `[0.0, 1.0]` that a `Trace`/`Debug` event survives.
    #[must_use]
    pub fn sampling_rate(mut self, rate: f64) -> Self {
        self.sampling_rate = Some(rate);
        self
    }

    /// Override the threshold for a package and everything below it.
    #[must_use]
    pub fn package_level(mut self, package: impl Into<String>, level: Level) -> Self {
        self.package_levels.insert(package.into(), level);
        self
    }

    /// Add several package overrides at once.
    #[must_use]
    pub fn package_levels<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, Level)>,
        S: Into<String>,
    {
        for (package, level) in overrides {
            self.package_levels.insert(package.into(), level);
        }
        self
    }

    /// Validate and build. Fails if the sampling rate is outside `[0.0, 1.0]`
    /// or not finite. An empty appender set falls back to a JSON console
    /// appender.
    pub fn build(self) -> Result<LogConfig> {
        let sampling_rate = self.sampling_rate.unwrap_or(1.0);
        if !sampling_rate.is_finite() || !(0.0..=1.0).contains(&sampling_rate) {
            return Err(LoggerError::config(
                "sampling",
                format!("rate must be between 0.0 and 1.0, got {sampling_rate}"),
            ));
        }

        let appenders = if self.appenders.is_empty() {
            vec![super::appender::shared(JsonConsoleAppender::new())]
        } else {
            self.appenders
        };

        Ok(LogConfig {
            min_level: self.min_level.unwrap_or(Level::Info),
            appenders,
            sampling_rate,
            package_levels: self.package_levels,
        })
    }
}

/// Install `config` as the active configuration for the whole process.
pub fn configure(config: LogConfig) {
    *CONFIG.write() = Some(Arc::new(config));
}

/// The active configuration, installing the default on first use.
pub fn current() -> Arc<LogConfig> {
    if let Some(config) = CONFIG.read().as_ref() {
        return Arc::clone(config);
    }
    let mut guard = CONFIG.write();
    match guard.as_ref() {
        Some(config) => Arc::clone(config),
        None => {
            let config = Arc::new(LogConfig::default());
            *guard = Some(Arc::clone(&config));
            config
        }
    }
}

/// Drop the active configuration; the next emission sees the default.
pub fn reset() {
    *CONFIG.write() = None;
}
