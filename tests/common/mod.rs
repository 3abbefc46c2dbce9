#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cwlogs::remote::{
    timestamp_from_millis, EventFilter, EventPage, FilteredLogEvent, LogService,
    LogStreamDescriptor, ServiceError, StreamListing, StreamPage,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// In-memory log service that replays canned pages and records every request.
#[derive(Default)]
pub struct ScriptedService {
    pub groups: Vec<String>,
    /// Stream pages keyed by the continuation token that fetches them.
    pub stream_pages: HashMap<Option<String>, StreamPage>,
    pub event_pages: Mutex<VecDeque<Result<EventPage, ServiceError>>>,
    pub stream_requests: Mutex<Vec<StreamListing>>,
    pub event_requests: Mutex<Vec<EventFilter>>,
}

impl ScriptedService {
    pub fn with_group(group: &str) -> Self {
        Self {
            groups: vec![group.to_string()],
            ..Default::default()
        }
    }

    pub fn stream_page(mut self, token: Option<&str>, page: StreamPage) -> Self {
        self.stream_pages.insert(token.map(str::to_string), page);
        self
    }

    pub fn event_page(self, page: EventPage) -> Self {
        self.event_pages.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn event_failure(self, message: &str) -> Self {
        self.event_pages
            .lock()
            .unwrap()
            .push_back(Err(ServiceError::Request {
                operation: "FilterLogEvents",
                message: message.to_string(),
            }));
        self
    }

    pub fn event_requests(&self) -> Vec<EventFilter> {
        self.event_requests.lock().unwrap().clone()
    }

    pub fn stream_requests(&self) -> Vec<StreamListing> {
        self.stream_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogService for ScriptedService {
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .groups
            .iter()
            .filter(|g| g.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn describe_log_streams(
        &self,
        request: &StreamListing,
    ) -> Result<StreamPage, ServiceError> {
        self.stream_requests.lock().unwrap().push(request.clone());
        Ok(self
            .stream_pages
            .get(&request.next_token)
            .cloned()
            .unwrap_or_default())
    }

    async fn filter_log_events(&self, request: &EventFilter) -> Result<EventPage, ServiceError> {
        self.event_requests.lock().unwrap().push(request.clone());
        self.event_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(EventPage::default()))
    }
}

pub fn at(millis: i64) -> DateTime<Utc> {
    timestamp_from_millis(Some(millis))
}

pub fn event(id: &str, stream: &str, created: i64, message: &str) -> FilteredLogEvent {
    FilteredLogEvent {
        event_id: id.to_string(),
        log_stream_name: stream.to_string(),
        timestamp: at(created),
        ingestion_time: at(created + 10),
        message: message.to_string(),
    }
}

pub fn page(events: Vec<FilteredLogEvent>, next_token: Option<&str>) -> EventPage {
    EventPage {
        events,
        next_token: next_token.map(str::to_string),
    }
}

pub fn stream(name: &str, created: i64, last_event: Option<i64>) -> LogStreamDescriptor {
    LogStreamDescriptor {
        name: name.to_string(),
        creation_time: at(created),
        last_event_time: last_event.map(at),
    }
}

pub fn streams(list: Vec<LogStreamDescriptor>, next_token: Option<&str>) -> StreamPage {
    StreamPage {
        streams: list,
        next_token: next_token.map(str::to_string),
    }
}
