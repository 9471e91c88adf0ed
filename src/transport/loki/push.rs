//! Loki push API payload.
//!
//! `POST /loki/api/v1/push` with
//! `{"streams":[{"stream":{<labels>},"values":[["<unix nanos>","<line>"]]}]}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logging::{Level, LogRecord};

/// Path appended to the configured base address.
pub const PUSH_PATH: &str = "/loki/api/v1/push";

/// Label added to every stream carrying the record level.
pub const LEVEL_LABEL: &str = "level";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRequest {
    pub streams: Vec<Stream>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub stream: BTreeMap<String, String>,
    /// `[timestamp_nanos, line]` pairs, oldest first.
    pub values: Vec<[String; 2]>,
}

impl PushRequest {
    /// Build one stream per level, each labelled with `labels` plus `level`.
    ///
    /// Records that fail to serialize are skipped; the count is returned.
    pub fn from_records(labels: &BTreeMap<String, String>, records: &[LogRecord]) -> (Self, usize) {
        let mut by_level: BTreeMap<Level, Vec<[String; 2]>> = BTreeMap::new();
        let mut skipped = 0;

        for record in records {
            match record.to_json_line() {
                Ok(line) => by_level
                    .entry(record.level)
                    .or_default()
                    .push([record.unix_nanos().to_string(), line]),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unserializable log record");
                    skipped += 1;
                }
            }
        }

        let streams = by_level
            .into_iter()
            .map(|(level, values)| {
                let mut stream = labels.clone();
                stream.insert(LEVEL_LABEL.to_string(), level.as_str().to_string());
                Stream { stream, values }
            })
            .collect();

        (Self { streams }, skipped)
    }

    /// Number of log lines across all streams.
    pub fn line_count(&self) -> usize {
        self.streams.iter().map(|s| s.values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn labels() -> BTreeMap<String, String> {
        BTreeMap::from([("app".to_string(), "web-app".to_string())])
    }

    fn record(level: Level, msg: &str) -> LogRecord {
        let mut fields = Map::new();
        fields.insert("service".into(), json!("web-backend"));
        LogRecord::new(level, msg, fields)
    }

    #[test]
    fn test_groups_by_level() {
        let records = vec![
            record(Level::Info, "a"),
            record(Level::Error, "b"),
            record(Level::Info, "c"),
        ];
        let (request, skipped) = PushRequest::from_records(&labels(), &records);

        assert_eq!(skipped, 0);
        assert_eq!(request.streams.len(), 2);
        assert_eq!(request.line_count(), 3);

        let info = &request.streams[0];
        assert_eq!(info.stream["app"], "web-app");
        assert_eq!(info.stream["level"], "info");
        assert_eq!(info.values.len(), 2);

        let line: Value = serde_json::from_str(&info.values[1][1]).unwrap();
        assert_eq!(line["msg"], "c");
        assert_eq!(line["service"], "web-backend");
        assert_eq!(info.values[1][0], records[2].unix_nanos().to_string());

        assert_eq!(request.streams[1].stream["level"], "error");
    }

    #[test]
    fn test_wire_shape() {
        let (request, _) = PushRequest::from_records(&labels(), &[record(Level::Warn, "x")]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["streams"][0]["stream"], json!({ "app": "web-app", "level": "warn" }));
        assert!(body["streams"][0]["values"][0][0].is_string());
        assert!(body["streams"][0]["values"][0][1].is_string());
    }

    #[test]
    fn test_empty() {
        let (request, _) = PushRequest::from_records(&labels(), &[]);
        assert!(request.is_empty());
    }
}
