//! Asynchronous appender with a bounded queue and a dedicated worker thread

use crate::core::appender::{panic_message, Appender};
use crate::core::error::{LoggerError, Result};
use crate::core::event::LogEvent;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Default bounded queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default time to wait for the worker to drain during shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

// Emit a queue-full warning for the first drop and then once per this many.
const DROP_ALERT_INTERVAL: u64 = 1000;

/// What to do when the queue is full at enqueue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Discard the incoming event and count it. Emitters never stall.
    #[default]
    DropOnFull,
    /// Block the emitting thread until the worker frees a slot.
    BlockOnFull,
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverflowPolicy::DropOnFull => write!(f, "drop-on-full"),
            OverflowPolicy::BlockOnFull => write!(f, "block-on-full"),
        }
    }
}

/// Lifecycle of an [`AsyncAppender`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncState {
    /// Accepting events and delivering in the background.
    Running,
    /// Queue closed, worker still draining the backlog.
    Draining,
    /// No worker handle remains: the worker finished, or a timed-out
    /// shutdown abandoned it while it drains in the background. Either way
    /// new appends fall through synchronously to the delegate.
    Stopped,
}

/// Decouples emitters from a slow delegate appender.
///
/// `append` enqueues onto a bounded channel and returns; a dedicated worker
/// thread dequeues and drives the delegate. Overflow behavior is governed by
/// [`OverflowPolicy`]. Shutdown closes the queue, lets the worker drain the
/// backlog, and flushes the delegate; events enqueued before shutdown are
/// never lost to an orderly stop.
pub struct AsyncAppender {
    delegate: Arc<Mutex<Box<dyn Appender>>>,
    sender: Option<Sender<LogEvent>>,
    worker: Option<JoinHandle<()>>,
    policy: OverflowPolicy,
    capacity: usize,
    dropped: Arc<AtomicU64>,
}

impl AsyncAppender {
    /// Wrap `delegate` with the default capacity and drop-on-full policy.
    pub fn new(delegate: Box<dyn Appender>) -> Result<Self> {
        Self::with_options(delegate, DEFAULT_QUEUE_CAPACITY, OverflowPolicy::default())
    }

    /// Wrap `delegate` with an explicit queue capacity and overflow policy.
    pub fn with_options(
        delegate: Box<dyn Appender>,
        capacity: usize,
        policy: OverflowPolicy,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(LoggerError::config(
                "AsyncAppender",
                "queue capacity must be greater than zero",
            ));
        }

        let delegate = Arc::new(Mutex::new(delegate));
        let (sender, receiver) = bounded::<LogEvent>(capacity);
        let worker = spawn_worker(Arc::clone(&delegate), receiver)?;

        Ok(Self {
            delegate,
            sender: Some(sender),
            worker: Some(worker),
            policy,
            capacity,
            dropped: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Events currently waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.sender.as_ref().map(Sender::len).unwrap_or(0)
    }

    /// Total events discarded by the drop-on-full policy.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> AsyncState {
        match (&self.sender, &self.worker) {
            (Some(_), Some(_)) => AsyncState::Running,
            (None, Some(_)) => AsyncState::Draining,
            _ => AsyncState::Stopped,
        }
    }

    /// Close the queue and wait up to `timeout` for the worker to drain the
    /// backlog and flush the delegate.
    ///
    /// Returns `true` on a clean drain. Returns `false` if the worker
    /// panicked or did not finish in time; a timed-out worker is abandoned
    /// and may still be draining in the background, while new appends fall
    /// through synchronously to the delegate. After either outcome
    /// [`state`](Self::state) reports [`AsyncState::Stopped`]; only the
    /// return value distinguishes a clean drain from an abandonment.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        // Dropping the sender disconnects the channel once the backlog is
        // consumed, which ends the worker loop.
        self.sender = None;

        let Some(handle) = self.worker.take() else {
            return true;
        };

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                eprintln!(
                    "[LOGGER WARNING] Async worker did not drain within {:?}; abandoning it",
                    timeout
                );
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        match handle.join() {
            Ok(()) => true,
            Err(payload) => {
                eprintln!(
                    "[LOGGER CRITICAL] Async worker panicked: {}",
                    panic_message(payload)
                );
                false
            }
        }
    }

    fn append_sync(&self, event: &LogEvent) -> Result<()> {
        self.delegate.lock().append(event)
    }
}

fn spawn_worker(
    delegate: Arc<Mutex<Box<dyn Appender>>>,
    receiver: Receiver<LogEvent>,
) -> Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("log-async-worker".to_string())
        .spawn(move || {
            // Consumes until every sender is gone and the backlog is empty
            for event in receiver {
                let mut delegate = delegate.lock();
                match catch_unwind(AssertUnwindSafe(|| delegate.append(&event))) {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        eprintln!("[LOGGER ERROR] Async delegate failed to append: {}", e);
                    }
                    Err(payload) => {
                        eprintln!(
                            "[LOGGER CRITICAL] Async delegate panicked during append: {}",
                            panic_message(payload)
                        );
                    }
                }
            }
            if let Err(e) = delegate.lock().flush() {
                eprintln!("[LOGGER ERROR] Async delegate failed to flush: {}", e);
            }
        })
        .map_err(|e| LoggerError::other(format!("failed to spawn async worker: {}", e)))
}

impl Appender for AsyncAppender {
    fn append(&mut self, event: &LogEvent) -> Result<()> {
        let Some(sender) = self.sender.as_ref() else {
            // Queue closed; deliver synchronously so late events still land
            return self.append_sync(event);
        };

        match self.policy {
            OverflowPolicy::DropOnFull => match sender.try_send(event.clone()) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => {
                    let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                    if dropped == 1 || dropped % DROP_ALERT_INTERVAL == 0 {
                        eprintln!(
                            "[LOGGER WARNING] Async queue full (capacity {}); {} events dropped so far",
                            self.capacity, dropped
                        );
                    }
                    Ok(())
                }
                Err(TrySendError::Disconnected(_)) => self.append_sync(event),
            },
            OverflowPolicy::BlockOnFull => match sender.send(event.clone()) {
                Ok(()) => Ok(()),
                // Worker gone mid-send; fall back rather than lose the event
                Err(_) => self.append_sync(event),
            },
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.delegate.lock().flush()
    }

    fn name(&self) -> &str {
        "async"
    }
}

impl Drop for AsyncAppender {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}
