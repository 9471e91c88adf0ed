//! The structured record passed from a logger to its transport.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::logging::Level;

/// Keys owned by the record itself; fields with these names are dropped.
pub const RESERVED_KEYS: [&str; 3] = ["level", "time", "msg"];

/// One log event after base fields, bindings and call-site fields merged.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub msg: String,
    pub fields: Map<String, Value>,
}

impl LogRecord {
    pub fn new(level: Level, msg: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            time: Utc::now(),
            level,
            msg: msg.into(),
            fields,
        }
    }

    /// Render as a single JSON line:
    /// `{"level":30,"time":<millis>,<fields...>,"msg":"..."}`.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Iterate the fields a renderer may show.
    pub fn visible_fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
    }

    /// Timestamp in nanoseconds since the epoch, as Loki expects it.
    pub fn unix_nanos(&self) -> i64 {
        self.time
            .timestamp_nanos_opt()
            .unwrap_or_else(|| self.time.timestamp_millis().saturating_mul(1_000_000))
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("level", &self.level.value())?;
        map.serialize_entry("time", &self.time.timestamp_millis())?;
        for (key, value) in self.visible_fields() {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("msg", &self.msg)?;
        map.end()
    }
}
