pub mod level;
pub mod payload;

use crate::remote::FilteredLogEvent;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use level::{Level, ParseLevelError};
pub use payload::{EventError, EventInfo, LogPayload};

/// A parsed log line together with the delivery metadata of the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    #[serde(flatten)]
    pub payload: LogPayload,
    pub stream: String,
    pub group: String,
    /// Unique within the group; used for deduplication.
    pub id: String,
    pub ingest_time: DateTime<Utc>,
    pub creation_time: DateTime<Utc>,
}

impl LogEvent {
    pub fn from_filtered(event: FilteredLogEvent, group: &str) -> Self {
        let payload = LogPayload::parse(&event.message, event.timestamp);

        Self {
            payload,
            stream: event.log_stream_name,
            group: group.to_string(),
            id: event.event_id,
            ingest_time: event.ingestion_time,
            creation_time: event.timestamp,
        }
    }

    /// Time the event says it happened, or its creation time if it does not say.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.payload.time
    }

    pub fn level(&self) -> Level {
        self.payload.level
    }

    pub fn message(&self) -> &str {
        &self.payload.message
    }
}

/// Stable sort by the store's creation time.
pub fn sort_by_creation_time(events: &mut [LogEvent]) {
    events.sort_by_key(|event| event.creation_time);
}
