//! End-to-end pipeline tests through the public API.

use lumber::appenders::{
    AsyncAppender, CompositeAppender, FileAppender, OverflowPolicy, RollingFileAppender,
};
use lumber::core::{
    config, logger, shared, Appender, FieldValue, Level, LogConfig, LogContext, LogEvent, Result,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// The active configuration is process-wide; tests that install one take this
// lock so parallel test threads cannot interleave.
static CONFIG_LOCK: Mutex<()> = Mutex::new(());

struct MemoryAppender {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl Appender for MemoryAppender {
    fn append(&mut self, event: &LogEvent) -> Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn memory() -> (lumber::core::SharedAppender, Arc<Mutex<Vec<LogEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let appender = shared(MemoryAppender {
        events: Arc::clone(&events),
    });
    (appender, events)
}

fn read_json_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_file_pipeline_end_to_end() {
    let _guard = CONFIG_LOCK.lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");

    config::configure(
        LogConfig::builder()
            .min_level(Level::Debug)
            .appender(shared(FileAppender::new(&path).unwrap()))
            .build()
            .unwrap(),
    );

    let log = logger("shop.checkout");
    LogContext::bind("request_id", "r-100").run(|| {
        log.info("order placed")
            .field("order_id", 4711)
            .field("total", 19.99)
            .emit();
    });
    log.debug("cache warm").emit();
    config::reset();

    let lines = read_json_lines(&path);
    assert_eq!(lines.len(), 2);

    let first = &lines[0];
    assert_eq!(first["level"], "INFO");
    assert_eq!(first["logger"], "shop.checkout");
    assert_eq!(first["message"], "order placed");
    assert_eq!(first["order_id"], 4711);
    assert_eq!(first["total"], 19.99);
    assert_eq!(first["_request_id"], "r-100");
    assert!(first["timestamp"].as_str().unwrap().ends_with('Z'));

    // Context scope ended before the second emission
    assert!(lines[1].get("_request_id").is_none());
}

#[test]
fn test_package_overrides_and_sampling_through_public_api() {
    let _guard = CONFIG_LOCK.lock();
    let (appender, events) = memory();

    config::configure(
        LogConfig::builder()
            .min_level(Level::Trace)
            .package_level("vendor", Level::Error)
            .package_level("vendor.payments", Level::Info)
            .sampling_rate(0.0)
            .appender(appender)
            .build()
            .unwrap(),
    );

    // rate 0.0 drops every Trace/Debug event but never touches Info+
    logger("app.worker").trace("sampled away").emit();
    logger("app.worker").debug("sampled away too").emit();
    logger("app.worker").info("kept").emit();

    // longest dotted prefix wins over the shorter vendor override
    logger("vendor.http").warn("suppressed").emit();
    logger("vendor.payments.gateway").info("kept").emit();

    config::reset();

    let events = events.lock();
    let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["kept", "kept"]);
    assert_eq!(events[1].logger_name, "vendor.payments.gateway");
}

#[test]
fn test_emission_macros() {
    let _guard = CONFIG_LOCK.lock();
    let (appender, events) = memory();
    config::configure(
        LogConfig::builder()
            .min_level(Level::Trace)
            .appender(appender)
            .build()
            .unwrap(),
    );

    let log = logger("app.macros");
    lumber::info!(log, "listening on port {}", 8080);
    lumber::error!(log, "worker {} died", 3);
    config::reset();

    let events = events.lock();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].message, "listening on port 8080");
    assert_eq!(events[0].level, Level::Info);
    assert_eq!(events[1].message, "worker 3 died");
    assert_eq!(events[1].level, Level::Error);
}

#[test]
fn test_rolling_pipeline_rotates_and_loses_nothing() {
    let _guard = CONFIG_LOCK.lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("svc.log");

    config::configure(
        LogConfig::builder()
            .appender(shared(RollingFileAppender::new(&path, 400).unwrap()))
            .build()
            .unwrap(),
    );

    let log = logger("svc.rotation");
    for i in 0..20 {
        log.info(format!("event number {}", i)).emit();
    }
    config::reset();

    let mut messages = Vec::new();
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let file = entry.unwrap().path();
        assert!(std::fs::metadata(&file).unwrap().len() <= 400);
        for value in read_json_lines(&file) {
            messages.push(value["message"].as_str().unwrap().to_string());
        }
    }
    messages.sort();
    assert_eq!(messages.len(), 20);
    for i in 0..20 {
        assert!(messages.contains(&format!("event number {}", i)));
    }
}

#[test]
fn test_async_composite_pipeline_drains_on_shutdown() {
    let _guard = CONFIG_LOCK.lock();
    let dir = TempDir::new().unwrap();
    let path_a = dir.path().join("a.log");
    let path_b = dir.path().join("b.log");

    let composite = CompositeAppender::new(vec![
        Box::new(FileAppender::new(&path_a).unwrap()) as Box<dyn Appender>,
        Box::new(FileAppender::new(&path_b).unwrap()),
    ])
    .unwrap();
    let mut wrapped =
        AsyncAppender::with_options(Box::new(composite), 64, OverflowPolicy::BlockOnFull).unwrap();

    let log = logger("svc.async");
    let events: Vec<LogEvent> = (0..30)
        .map(|i| LogEvent::new(Level::Info, format!("queued {}", i), log.name()))
        .collect();
    for event in &events {
        wrapped.append(event).unwrap();
    }
    assert!(wrapped.shutdown(Duration::from_secs(5)));

    assert_eq!(read_json_lines(&path_a).len(), 30);
    assert_eq!(read_json_lines(&path_b).len(), 30);
}

#[test]
fn test_async_appender_in_configured_pipeline_drains_on_drop() {
    let _guard = CONFIG_LOCK.lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("async.log");

    let delegate = Box::new(FileAppender::new(&path).unwrap());
    let wrapped =
        AsyncAppender::with_options(delegate, 64, OverflowPolicy::BlockOnFull).unwrap();
    config::configure(
        LogConfig::builder()
            .appender(shared(wrapped))
            .build()
            .unwrap(),
    );

    let log = logger("svc.async.configured");
    for i in 0..25 {
        log.info(format!("buffered {}", i)).emit();
    }

    // Dropping the last handle to the appender shuts it down and drains
    config::reset();

    assert_eq!(read_json_lines(&path).len(), 25);
}

#[test]
fn test_context_propagates_to_worker_thread_when_asked() {
    let _guard = CONFIG_LOCK.lock();
    let (appender, events) = memory();
    config::configure(LogConfig::builder().appender(appender).build().unwrap());

    LogContext::bind("job_id", "j-9").run(|| {
        let inherited = LogContext::propagate();
        std::thread::spawn(move || {
            inherited.run(|| {
                logger("svc.jobs").info("from worker").emit();
            });
        })
        .join()
        .unwrap();
    });
    config::reset();

    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].context,
        vec![("job_id".to_string(), "j-9".to_string())]
    );
}

#[test]
fn test_nested_field_values_survive_to_the_wire() {
    let _guard = CONFIG_LOCK.lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested.log");
    config::configure(
        LogConfig::builder()
            .appender(shared(FileAppender::new(&path).unwrap()))
            .build()
            .unwrap(),
    );

    let tags: lumber::core::FieldMap = [("region", "eu"), ("tier", "gold")].into_iter().collect();
    logger("svc.wire")
        .info("snapshot")
        .field("ids", vec![1, 2, 3])
        .field("tags", FieldValue::Map(tags))
        .field("missing", FieldValue::Null)
        .emit();
    config::reset();

    let lines = read_json_lines(&path);
    assert_eq!(lines[0]["ids"], serde_json::json!([1, 2, 3]));
    assert_eq!(lines[0]["tags"], serde_json::json!({"region": "eu", "tier": "gold"}));
    assert_eq!(lines[0]["missing"], serde_json::Value::Null);
}
