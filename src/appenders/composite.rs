//! Composite appender with per-child fault isolation

use crate::core::appender::{panic_message, Appender};
use crate::core::error::{LoggerError, Result};
use crate::core::event::LogEvent;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Fans each event out to every child in order.
///
/// A failing or panicking child is reported to stderr and skipped; the
/// remaining children still receive the event. `append` and `flush` report
/// success as long as the composite itself ran, regardless of child outcomes.
pub struct CompositeAppender {
    children: Vec<Box<dyn Appender>>,
}

impl CompositeAppender {
    /// Build from a non-empty child set. A composite with nothing to deliver
    /// to is a configuration mistake and is rejected.
    pub fn new(children: Vec<Box<dyn Appender>>) -> Result<Self> {
        if children.is_empty() {
            return Err(LoggerError::config(
                "CompositeAppender",
                "at least one child appender is required",
            ));
        }
        Ok(Self { children })
    }

    /// Add another child to the end of the delivery order.
    pub fn add(&mut self, child: Box<dyn Appender>) {
        self.children.push(child);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Appender for CompositeAppender {
    fn append(&mut self, event: &LogEvent) -> Result<()> {
        for (index, child) in self.children.iter_mut().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| child.append(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Child appender {} failed to append: {}", index, e);
                }
                Err(payload) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Child appender {} panicked during append: {}",
                        index,
                        panic_message(payload)
                    );
                }
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        for (index, child) in self.children.iter_mut().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| child.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Child appender {} failed to flush: {}", index, e);
                }
                Err(payload) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Child appender {} panicked during flush: {}",
                        index,
                        panic_message(payload)
                    );
                }
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "composite"
    }
}
