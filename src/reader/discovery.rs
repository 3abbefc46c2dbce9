//! Finding the log streams that were active inside a time window.
//!
//! With a name prefix the service cannot order by activity, so every page has
//! to be scanned. Without one, streams come back most recently active first
//! and paging stops at the first page that reaches back past the window.

use super::error::ReaderError;
use super::window::TimeWindow;
use crate::remote::{LogService, LogStreamDescriptor, StreamListing, StreamOrder};
use tracing::debug;

/// Most stream names a single filter call accepts.
pub const MAX_STREAMS: usize = 100;

pub async fn discover(
    service: &dyn LogService,
    group: &str,
    prefix: Option<&str>,
    window: &TimeWindow,
    max_streams: usize,
) -> Result<Vec<LogStreamDescriptor>, ReaderError> {
    let order = match prefix {
        Some(_) => StreamOrder::ByName,
        None => StreamOrder::LastEventDescending,
    };
    let mut request = StreamListing {
        group: group.to_string(),
        prefix: prefix.map(str::to_string),
        order,
        next_token: None,
    };

    let mut streams = Vec::new();
    let mut pages = 0usize;
    'pages: loop {
        let page = service.describe_log_streams(&request).await?;
        pages += 1;

        let mut reached_older = false;
        for stream in page.streams {
            if streams.len() >= max_streams {
                break 'pages;
            }
            if stream.last_event_time.is_some_and(|last| last < window.start) {
                reached_older = true;
                continue;
            }
            if !window.admits_creation(stream.creation_time) {
                continue;
            }
            streams.push(stream);
        }

        if streams.len() >= max_streams {
            break;
        }
        if reached_older && order == StreamOrder::LastEventDescending {
            // Everything on later pages is older still.
            break;
        }
        match page.next_token {
            Some(token) => request.next_token = Some(token),
            None => break,
        }
    }

    debug!(
        group = %group,
        prefix = ?prefix,
        pages = pages,
        streams = streams.len(),
        "Discovered log streams"
    );

    if streams.is_empty() {
        return Err(ReaderError::NoMatchingStreams {
            prefix: prefix.map(str::to_string),
        });
    }

    sort_by_last_event(&mut streams);
    Ok(streams)
}

/// Most recently active first; ties keep their input order.
pub fn sort_by_last_event(streams: &mut [LogStreamDescriptor]) {
    streams.sort_by(|a, b| b.last_event_or_epoch().cmp(&a.last_event_or_epoch()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::timestamp_from_millis;

    fn stream(name: &str, last: Option<i64>) -> LogStreamDescriptor {
        LogStreamDescriptor {
            name: name.to_string(),
            creation_time: timestamp_from_millis(Some(0)),
            last_event_time: last.map(|ms| timestamp_from_millis(Some(ms))),
        }
    }

    #[test]
    fn test_sort_descending_with_absent_as_zero() {
        let mut streams = vec![
            stream("idle", None),
            stream("old", Some(10)),
            stream("new", Some(30)),
            stream("mid-a", Some(20)),
            stream("mid-b", Some(20)),
            stream("zero", Some(0)),
        ];
        sort_by_last_event(&mut streams);

        let names: Vec<_> = streams.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["new", "mid-a", "mid-b", "old", "idle", "zero"]);

        for pair in streams.windows(2) {
            assert!(pair[0].last_event_or_epoch() >= pair[1].last_event_or_epoch());
        }
    }
}
