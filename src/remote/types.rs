use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A log stream as reported by the log service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStreamDescriptor {
    pub name: String,
    pub creation_time: DateTime<Utc>,
    /// Absent for streams that have never received an event.
    pub last_event_time: Option<DateTime<Utc>>,
}

impl LogStreamDescriptor {
    /// Last event time used for ordering; absent sorts as the epoch.
    pub fn last_event_or_epoch(&self) -> DateTime<Utc> {
        self.last_event_time.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Ordering requested from the stream listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOrder {
    /// Server default; the only ordering that allows a name prefix.
    ByName,
    /// Most recently active first.
    LastEventDescending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamListing {
    pub group: String,
    pub prefix: Option<String>,
    pub order: StreamOrder,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StreamPage {
    pub streams: Vec<LogStreamDescriptor>,
    pub next_token: Option<String>,
}

/// A single event as returned by the filter call, before payload parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredLogEvent {
    pub event_id: String,
    pub log_stream_name: String,
    pub timestamp: DateTime<Utc>,
    pub ingestion_time: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub group: String,
    /// Empty means every stream in the group.
    pub stream_names: Vec<String>,
    pub start: DateTime<Utc>,
    /// `None` fetches up to the current time on every call.
    pub end: Option<DateTime<Utc>>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<FilteredLogEvent>,
    /// Present while more pages remain.
    pub next_token: Option<String>,
}

/// Convert a millisecond timestamp from the service; missing values map to the epoch.
pub fn timestamp_from_millis(millis: Option<i64>) -> DateTime<Utc> {
    millis
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
