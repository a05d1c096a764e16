//! Scoped ambient context
//!
//! A context scope binds key/value pairs for the duration of a closure; every
//! event emitted inside the closure carries a snapshot of the installed
//! mapping. Scopes nest additively (inner keys win), and the outer mapping is
//! restored on every exit path, including panics.
//!
//! The installed mapping is thread-local. Threads spawned from inside a scope
//! do not inherit it implicitly; capture it with [`LogContext::propagate`] and
//! install it in the child:
//!
//! ```
//! use lumber::core::context::LogContext;
//!
//! LogContext::bind("request_id", "abc-123").run(|| {
//!     let inherited = LogContext::propagate();
//!     std::thread::spawn(move || {
//!         inherited.run(|| {
//!             assert!(LogContext::current().contains_key("request_id"));
//!         });
//!     })
//!     .join()
//!     .unwrap();
//! });
//! ```

use super::field::{FieldMap, FieldValue};
use std::cell::RefCell;

thread_local! {
    static CURRENT: RefCell<Option<FieldMap>> = const { RefCell::new(None) };
}

/// Builder for a context scope.
///
/// ```
/// use lumber::core::context::LogContext;
///
/// LogContext::bind("request_id", "abc-123")
///     .and("user_id", 42)
///     .run(|| {
///         let current = LogContext::current();
///         assert_eq!(current.len(), 2);
///     });
/// ```
pub struct LogContext {
    bound: FieldMap,
}

impl LogContext {
    /// Start building a scope with one key/value pair.
    pub fn bind(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let mut bound = FieldMap::new();
        bound.insert(key, value);
        Self { bound }
    }

    /// Start building a scope from an existing mapping.
    pub fn bind_all(values: FieldMap) -> Self {
        Self { bound: values }
    }

    /// Add another key/value pair to this scope.
    pub fn and(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.bound.insert(key, value);
        self
    }

    /// Run `action` with this scope merged into the current mapping.
    ///
    /// Merge rule: the previous mapping is extended with the bound pairs, the
    /// bound value winning on key collision. `Null` bindings are dropped and
    /// never erase an existing outer value. The previous mapping is restored
    /// exactly when `action` returns or panics.
    pub fn run<R>(self, action: impl FnOnce() -> R) -> R {
        let previous = CURRENT.with(|c| c.borrow().clone());

        let mut merged = previous.clone().unwrap_or_default();
        for (key, value) in self.bound {
            if !value.is_null() {
                merged.insert(key, value);
            }
        }

        CURRENT.with(|c| *c.borrow_mut() = Some(merged));
        let _restore = RestoreOnDrop { previous };
        action()
    }

    /// The mapping currently installed for this thread, empty if none.
    pub fn current() -> FieldMap {
        CURRENT
            .with(|c| c.borrow().clone())
            .unwrap_or_default()
    }

    /// Capture the current mapping for installation in another thread.
    pub fn propagate() -> InheritedContext {
        InheritedContext {
            snapshot: Self::current(),
        }
    }
}

/// Owned snapshot of a context mapping, installable on another thread.
///
/// The snapshot is a copy: nesting inside the child never leaks back to the
/// thread that captured it.
pub struct InheritedContext {
    snapshot: FieldMap,
}

impl InheritedContext {
    /// Run `action` with the captured mapping installed as the current one.
    pub fn run<R>(self, action: impl FnOnce() -> R) -> R {
        let previous = CURRENT.with(|c| c.borrow().clone());
        CURRENT.with(|c| *c.borrow_mut() = Some(self.snapshot));
        let _restore = RestoreOnDrop { previous };
        action()
    }
}

// Restores the outer mapping when the scope exits, normally or by panic.
struct RestoreOnDrop {
    previous: Option<FieldMap>,
}

impl Drop for RestoreOnDrop {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|c| *c.borrow_mut() = previous);
    }
}
