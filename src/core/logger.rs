//! Named loggers and the emission path
//!
//! Loggers are cheap named handles obtained from [`logger`]; the same name
//! always yields the same handle. An emission starts with a severity gate
//! check, collects fields through [`EventBuilder`], snapshots the ambient
//! context, and fans the finished event out to every configured appender with
//! per-appender fault isolation.

use super::appender::panic_message;
use super::config;
use super::context::LogContext;
use super::event::LogEvent;
use super::field::{FieldMap, FieldValue};
use super::level::Level;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

static REGISTRY: RwLock<BTreeMap<String, Arc<Logger>>> = RwLock::new(BTreeMap::new());

/// Get the logger for `name`, creating it on first use.
///
/// Names are usually dotted like module paths (`"app.db.pool"`); package
/// level overrides match on those dots.
///
/// ```
/// let log = lumber::logger("app.auth");
/// log.info("service started").emit();
/// ```
pub fn logger(name: impl Into<String>) -> Arc<Logger> {
    let name = name.into();
    if let Some(existing) = REGISTRY.read().get(&name) {
        return Arc::clone(existing);
    }
    let mut registry = REGISTRY.write();
    Arc::clone(
        registry
            .entry(name.clone())
            .or_insert_with(|| Arc::new(Logger { name })),
    )
}

/// Forget every cached logger handle. Existing `Arc`s stay valid; the next
/// [`logger`] call for a name creates a fresh handle. Intended for tests.
pub fn reset_registry() {
    REGISTRY.write().clear();
}

/// Named emission handle.
pub struct Logger {
    name: String,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an emission at `level` would currently pass the gate.
    ///
    /// Note that when sampling is active this draws from the sampler, so two
    /// consecutive calls may disagree. Use the builder returned by
    /// [`Logger::log`] to make one decision per emission.
    pub fn is_enabled(&self, level: Level) -> bool {
        config::current().is_enabled(&self.name, level)
    }

    /// Begin an emission at `level`. The gate is consulted exactly once,
    /// here; a rejected builder skips all field work and emits nothing.
    pub fn log(&self, level: Level, message: impl Into<String>) -> EventBuilder<'_> {
        let config = config::current();
        let message = if config.is_enabled(&self.name, level) {
            Some(message.into())
        } else {
            None
        };
        EventBuilder {
            logger: self,
            config,
            level,
            message,
            fields: FieldMap::new(),
        }
    }

    pub fn trace(&self, message: impl Into<String>) -> EventBuilder<'_> {
        self.log(Level::Trace, message)
    }

    pub fn debug(&self, message: impl Into<String>) -> EventBuilder<'_> {
        self.log(Level::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) -> EventBuilder<'_> {
        self.log(Level::Info, message)
    }

    pub fn warn(&self, message: impl Into<String>) -> EventBuilder<'_> {
        self.log(Level::Warn, message)
    }

    pub fn error(&self, message: impl Into<String>) -> EventBuilder<'_> {
        self.log(Level::Error, message)
    }
}

/// In-progress emission.
///
/// Accumulates fields, then [`emit`](EventBuilder::emit) freezes the event
/// and delivers it. A builder whose gate check failed is inert: `field` and
/// `emit` do nothing.
#[must_use = "an event builder does nothing until emit() is called"]
pub struct EventBuilder<'a> {
    logger: &'a Logger,
    config: Arc<config::LogConfig>,
    level: Level,
    // None means the gate rejected this emission
    message: Option<String>,
    fields: FieldMap,
}

impl EventBuilder<'_> {
    /// Attach a structured field. Later duplicates replace earlier values.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        if self.message.is_some() {
            self.fields.insert(key, value);
        }
        self
    }

    /// Attach every entry of `fields`.
    pub fn fields(mut self, fields: FieldMap) -> Self {
        if self.message.is_some() {
            for (key, value) in fields {
                self.fields.insert(key, value);
            }
        }
        self
    }

    /// Freeze the event and deliver it to every configured appender.
    ///
    /// Delivery is isolated per appender: an `Err` or a panic from one is
    /// reported to stderr and the remaining appenders still receive the
    /// event. Delivery uses the configuration captured when the builder was
    /// created, so a concurrent reconfigure cannot split one emission across
    /// two appender sets.
    pub fn emit(self) {
        let Some(message) = self.message else {
            return;
        };

        let context: Vec<(String, String)> = LogContext::current()
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();

        let event = LogEvent::new(self.level, message, self.logger.name.clone())
            .with_fields(self.fields)
            .with_context(context);

        for (index, appender) in self.config.appenders().iter().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| appender.lock().append(&event)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender {} failed to append: {}", index, e);
                }
                Err(payload) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender {} panicked during append: {}",
                        index,
                        panic_message(payload)
                    );
                }
            }
        }
    }
}
