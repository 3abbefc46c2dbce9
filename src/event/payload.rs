use super::level::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An error attached to a structured log line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventError {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(rename = "error", alias = "message", default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub errno: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Value>,
}

/// Process context attached to a structured log line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub pid: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub uid: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub gid: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EventError>,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// The log line itself, parsed as far as the payload allows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogPayload {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub info: EventInfo,
    pub data: Map<String, Value>,
    pub message: String,
}

/// Wire shape of a JSON log line; everything is optional except that the
/// fields which are present must be well formed.
#[derive(Deserialize)]
struct StructuredLine {
    #[serde(default)]
    level: Level,
    #[serde(default)]
    time: Option<DateTime<Utc>>,
    #[serde(default)]
    info: EventInfo,
    #[serde(default)]
    data: Map<String, Value>,
    #[serde(default)]
    message: Option<String>,
}

impl LogPayload {
    /// Parse a raw message, falling back to plain text at INFO.
    ///
    /// `created` is used whenever the line does not carry its own time.
    pub fn parse(raw: &str, created: DateTime<Utc>) -> Self {
        match serde_json::from_str::<StructuredLine>(raw) {
            Ok(line) => Self {
                level: line.level,
                time: line.time.unwrap_or(created),
                info: line.info,
                data: line.data,
                message: line.message.unwrap_or_else(|| raw.to_string()),
            },
            Err(_) => Self::plain(raw, created),
        }
    }

    pub fn plain(message: &str, time: DateTime<Utc>) -> Self {
        Self {
            level: Level::Info,
            time,
            info: EventInfo::default(),
            data: Map::new(),
            message: message.to_string(),
        }
    }

    pub fn errors(&self) -> &[EventError] {
        &self.info.errors
    }
}
