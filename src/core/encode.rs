//! Wire-format serialization of log events
//!
//! Every event serializes to a single JSON object per line. Key order is
//! fixed: `timestamp`, `level`, `logger`, `thread`, `message`, then the
//! call-site fields in insertion order, then the ambient context entries
//! prefixed with `_`.

use super::event::LogEvent;

/// Timestamp format on the wire: UTC, millisecond precision, `Z` suffix.
pub const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Serialize an event to its single-line JSON wire form (no trailing newline).
///
/// Field keys that collide with an envelope key overwrite the envelope value,
/// and context keys can never collide thanks to the `_` prefix.
pub fn json_line(event: &LogEvent) -> String {
    let mut object = serde_json::Map::new();

    object.insert(
        "timestamp".to_string(),
        serde_json::Value::String(event.timestamp.format(WIRE_TIMESTAMP_FORMAT).to_string()),
    );
    object.insert(
        "level".to_string(),
        serde_json::Value::String(event.level.to_str().to_string()),
    );
    object.insert(
        "logger".to_string(),
        serde_json::Value::String(event.logger_name.clone()),
    );
    object.insert(
        "thread".to_string(),
        serde_json::Value::String(event.thread_name.clone()),
    );
    object.insert(
        "message".to_string(),
        serde_json::Value::String(event.message.clone()),
    );

    for (key, value) in event.fields.iter() {
        object.insert(key.to_string(), value.to_json_value());
    }

    for (key, value) in &event.context {
        object.insert(
            format!("_{key}"),
            serde_json::Value::String(value.clone()),
        );
    }

    serde_json::Value::Object(object).to_string()
}
