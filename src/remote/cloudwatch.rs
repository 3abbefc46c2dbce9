//! CloudWatch Logs backed [`LogService`].

use super::types::{
    timestamp_from_millis, EventFilter, EventPage, FilteredLogEvent, LogStreamDescriptor,
    StreamListing, StreamOrder, StreamPage,
};
use super::{LogService, ServiceError};
use crate::config::types::AwsConfig;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use aws_sdk_cloudwatchlogs::config::Region;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::OrderBy;
use tracing::{debug, trace};

#[derive(Clone, Debug)]
pub struct CloudWatchLogsService {
    client: cloudwatchlogs::Client,
}

impl CloudWatchLogsService {
    pub fn new(client: cloudwatchlogs::Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential chain, with optional
    /// region and profile overrides.
    pub async fn from_config(config: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "Loaded AWS configuration");

        Self::new(cloudwatchlogs::Client::new(&sdk_config))
    }
}

fn request_error<E>(operation: &'static str, err: E) -> ServiceError
where
    E: std::error::Error,
{
    ServiceError::Request {
        operation,
        message: DisplayErrorContext(&err).to_string(),
    }
}

#[async_trait]
impl LogService for CloudWatchLogsService {
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        let response = self
            .client
            .describe_log_groups()
            .log_group_name_prefix(prefix)
            .send()
            .await
            .map_err(|e| request_error("DescribeLogGroups", e))?;

        Ok(response
            .log_groups
            .unwrap_or_default()
            .into_iter()
            .filter_map(|group| group.log_group_name)
            .collect())
    }

    async fn describe_log_streams(
        &self,
        request: &StreamListing,
    ) -> Result<StreamPage, ServiceError> {
        let mut call = self
            .client
            .describe_log_streams()
            .log_group_name(&request.group)
            .set_log_stream_name_prefix(request.prefix.clone())
            .set_next_token(request.next_token.clone());

        if request.order == StreamOrder::LastEventDescending {
            call = call.order_by(OrderBy::LastEventTime).descending(true);
        }

        let response = call
            .send()
            .await
            .map_err(|e| request_error("DescribeLogStreams", e))?;

        let streams: Vec<LogStreamDescriptor> = response
            .log_streams
            .unwrap_or_default()
            .into_iter()
            .filter_map(|stream| {
                Some(LogStreamDescriptor {
                    name: stream.log_stream_name?,
                    creation_time: timestamp_from_millis(stream.creation_time),
                    last_event_time: stream
                        .last_event_timestamp
                        .map(|ms| timestamp_from_millis(Some(ms))),
                })
            })
            .collect();

        trace!(
            group = %request.group,
            count = streams.len(),
            has_more = response.next_token.is_some(),
            "Fetched log stream page"
        );

        Ok(StreamPage {
            streams,
            next_token: response.next_token,
        })
    }

    async fn filter_log_events(&self, request: &EventFilter) -> Result<EventPage, ServiceError> {
        let stream_names = if request.stream_names.is_empty() {
            None
        } else {
            Some(request.stream_names.clone())
        };

        let response = self
            .client
            .filter_log_events()
            .log_group_name(&request.group)
            .start_time(request.start.timestamp_millis())
            .set_end_time(request.end.map(|end| end.timestamp_millis()))
            .set_log_stream_names(stream_names)
            .set_next_token(request.next_token.clone())
            .send()
            .await
            .map_err(|e| request_error("FilterLogEvents", e))?;

        let mut events = Vec::new();
        for event in response.events.unwrap_or_default() {
            let Some(event_id) = event.event_id else {
                return Err(ServiceError::MalformedResponse {
                    operation: "FilterLogEvents",
                    message: "event without an id".to_string(),
                });
            };
            events.push(FilteredLogEvent {
                event_id,
                log_stream_name: event.log_stream_name.unwrap_or_default(),
                timestamp: timestamp_from_millis(event.timestamp),
                ingestion_time: timestamp_from_millis(event.ingestion_time),
                message: event.message.unwrap_or_default(),
            });
        }

        trace!(
            group = %request.group,
            count = events.len(),
            has_more = response.next_token.is_some(),
            "Fetched filtered event page"
        );

        Ok(EventPage {
            events,
            next_token: response.next_token,
        })
    }
}
