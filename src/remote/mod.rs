//! Seam to the remote log service.
//!
//! The reader only needs three calls: group lookup by name prefix, one page of
//! stream listing, and one page of filtered events. `CloudWatchLogsService`
//! implements them on top of the AWS SDK; tests substitute scripted services.

pub mod cloudwatch;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use cloudwatch::CloudWatchLogsService;
pub use types::{
    timestamp_from_millis, EventFilter, EventPage, FilteredLogEvent, LogStreamDescriptor,
    StreamListing, StreamOrder, StreamPage,
};

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("{operation} failed: {message}")]
    Request {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} returned an unusable response: {message}")]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },
}

#[async_trait]
pub trait LogService: Send + Sync {
    /// Names of log groups starting with `prefix`, in service order.
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>, ServiceError>;

    /// One page of streams for a group.
    async fn describe_log_streams(
        &self,
        request: &StreamListing,
    ) -> Result<StreamPage, ServiceError>;

    /// One page of events matching the filter.
    async fn filter_log_events(&self, request: &EventFilter) -> Result<EventPage, ServiceError>;
}
