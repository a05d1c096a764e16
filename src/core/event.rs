//! Log event structure

use super::field::FieldMap;
use super::level::Level;
use chrono::{DateTime, Utc};
use std::cell::RefCell;

// Thread-local cache for the emitting thread's name to avoid repeated
// allocations on every event.
thread_local! {
    static THREAD_NAME_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Name of the current thread, falling back to the thread id for unnamed
/// threads. Computed once per thread and cached.
pub(crate) fn current_thread_name() -> String {
    THREAD_NAME_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.is_none() {
            let current = std::thread::current();
            let name = match current.name() {
                Some(name) => name.to_string(),
                None => format!("{:?}", current.id()),
            };
            *cache = Some(name);
        }
        cache.clone().unwrap_or_default()
    })
}

/// Immutable snapshot of a single log emission.
///
/// Captured once at the emission site and never mutated afterwards; the
/// `fields` and `context` maps are always present (empty rather than absent).
/// Context keys get their reserved `_` prefix only at serialization time.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    /// Structured fields attached at the call site, insertion-ordered.
    pub fields: FieldMap,
    /// Ambient context snapshot, stringified, insertion-ordered.
    pub context: Vec<(String, String)>,
    /// Name of the thread that produced the event.
    pub thread_name: String,
    /// Logical emitter name, usually dotted like a module path.
    pub logger_name: String,
}

impl LogEvent {
    pub fn new(level: Level, message: impl Into<String>, logger_name: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            fields: FieldMap::new(),
            context: Vec::new(),
            thread_name: current_thread_name(),
            logger_name: logger_name.into(),
        }
    }

    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_context(mut self, context: Vec<(String, String)>) -> Self {
        self.context = context;
        self
    }
}
