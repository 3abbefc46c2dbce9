//! The log reader and its background event producer.
//!
//! `LogReader::stream_events` moves the reader state into a spawned producer
//! task. The producer is the only thing that touches the continuation token,
//! the dedup cache and the terminal error; the consumer only receives events
//! from the channel and, once it has closed, reads the terminal error.

use super::dedup::{EventDeduplicator, MAX_EVENTS_PER_CALL};
use super::discovery::{discover, MAX_STREAMS};
use super::error::{ReaderError, MAX_GROUP_SUGGESTIONS};
use super::window::TimeWindow;
use crate::config::types::ReaderConfig;
use crate::event::{sort_by_creation_time, LogEvent};
use crate::remote::{EventFilter, LogService, LogStreamDescriptor, ServiceError};
use chrono::Utc;
use futures::Future;
use std::num::NonZeroUsize;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Tuning knobs for a reader.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Pause between polls in follow mode.
    pub poll_interval: Duration,
    /// Events buffered between producer and consumer before the producer blocks.
    pub channel_capacity: usize,
    pub dedup_capacity: NonZeroUsize,
    pub max_streams: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            channel_capacity: 1,
            dedup_capacity: NonZeroUsize::new(MAX_EVENTS_PER_CALL).unwrap_or(NonZeroUsize::MIN),
            max_streams: MAX_STREAMS,
        }
    }
}

impl From<&ReaderConfig> for ReaderOptions {
    fn from(config: &ReaderConfig) -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: config.poll_interval,
            channel_capacity: config.channel_capacity.max(1),
            dedup_capacity: NonZeroUsize::new(config.dedup_capacity)
                .unwrap_or(defaults.dedup_capacity),
            max_streams: config.max_streams.clamp(1, MAX_STREAMS),
        }
    }
}

/// Reads events for one log group, optionally restricted to a stream prefix.
pub struct LogReader {
    service: Arc<dyn LogService>,
    group: String,
    prefix: Option<String>,
    window: TimeWindow,
    options: ReaderOptions,
}

impl LogReader {
    /// Resolve `group` and build a reader for it.
    ///
    /// The group must match exactly; otherwise the error carries up to five
    /// groups sharing the prefix. Streams are not discovered here.
    pub async fn open(
        service: Arc<dyn LogService>,
        group: &str,
        prefix: Option<&str>,
        window: TimeWindow,
        options: ReaderOptions,
    ) -> Result<Self, ReaderError> {
        resolve_log_group(service.as_ref(), group).await?;

        Ok(Self {
            service,
            group: group.to_string(),
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
            window,
            options,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Streams active in the reader's window, most recently active first.
    pub async fn list_streams(&self) -> Result<Vec<LogStreamDescriptor>, ReaderError> {
        discover(
            self.service.as_ref(),
            &self.group,
            self.prefix.as_deref(),
            &self.window,
            self.options.max_streams,
        )
        .await
    }

    /// Start the producer and return the consuming end.
    ///
    /// Without `follow` the stream ends after the last page, with events sorted
    /// by creation time. With `follow` events are forwarded page by page and
    /// polling continues until `cancel` fires, the stream is dropped, or a
    /// request fails.
    pub fn stream_events(self, follow: bool, cancel: CancellationToken) -> EventStream {
        let window = if follow {
            self.window
        } else {
            self.window.pinned(Utc::now())
        };

        let (tx, rx) = mpsc::channel(self.options.channel_capacity.max(1));
        let terminal = Arc::new(OnceLock::new());

        info!(
            group = %self.group,
            prefix = ?self.prefix,
            start = %window.start,
            end = ?window.end,
            follow = follow,
            "Streaming log events"
        );

        let producer = Producer {
            service: self.service,
            state: ReaderState {
                group: self.group,
                prefix: self.prefix,
                window,
                streams: None,
                next_token: None,
                dedup: EventDeduplicator::new(self.options.dedup_capacity),
            },
            follow,
            poll_interval: self.options.poll_interval,
            max_streams: self.options.max_streams,
            events: tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(producer.run(terminal.clone()));

        EventStream {
            events: rx,
            terminal,
            cancel,
            closed: false,
        }
    }
}

async fn resolve_log_group(service: &dyn LogService, name: &str) -> Result<(), ReaderError> {
    let groups = service.describe_log_groups(name).await?;
    if groups.iter().any(|group| group == name) {
        return Ok(());
    }

    Err(ReaderError::LogGroupNotFound {
        name: name.to_string(),
        suggestions: groups.into_iter().take(MAX_GROUP_SUGGESTIONS).collect(),
    })
}

struct ReaderState {
    group: String,
    prefix: Option<String>,
    window: TimeWindow,
    /// Resolved at most once, on first fetch.
    streams: Option<Vec<String>>,
    next_token: Option<String>,
    dedup: EventDeduplicator,
}

struct Producer {
    service: Arc<dyn LogService>,
    state: ReaderState,
    follow: bool,
    poll_interval: Duration,
    max_streams: usize,
    events: mpsc::Sender<LogEvent>,
    cancel: CancellationToken,
}

impl Producer {
    async fn run(mut self, terminal: Arc<OnceLock<ReaderError>>) {
        match self.fetch_loop().await {
            Ok(()) => debug!(group = %self.state.group, "Event stream exhausted"),
            Err(ReaderError::Cancelled) => {
                debug!(group = %self.state.group, "Event stream cancelled");
                let _ = terminal.set(ReaderError::Cancelled);
            }
            Err(e) => {
                warn!(group = %self.state.group, error = %e, "Event stream failed");
                let _ = terminal.set(e);
            }
        }
        // Dropping `self` closes the channel, after the terminal error is in place.
    }

    async fn fetch_loop(&mut self) -> Result<(), ReaderError> {
        let stream_names = self.resolve_streams().await?;
        let mut polls = 0u64;

        loop {
            polls += 1;
            let mut pending = Vec::new();
            let mut token = self.state.next_token.clone();
            let mut delivered = 0usize;
            let mut duplicates = 0usize;

            loop {
                let request = EventFilter {
                    group: self.state.group.clone(),
                    stream_names: stream_names.clone(),
                    start: self.state.window.start,
                    end: self.state.window.end,
                    next_token: token.clone(),
                };
                let page = self
                    .guarded(self.service.filter_log_events(&request))
                    .await?;

                for raw in page.events {
                    if self.state.dedup.seen(&raw.event_id) {
                        duplicates += 1;
                        continue;
                    }
                    let event = LogEvent::from_filtered(raw, &self.state.group);
                    delivered += 1;
                    if self.follow {
                        self.send(event).await?;
                    } else {
                        pending.push(event);
                    }
                }

                match page.next_token {
                    Some(next) => {
                        self.state.next_token = Some(next.clone());
                        token = Some(next);
                    }
                    None => break,
                }
            }

            debug!(
                group = %self.state.group,
                poll = polls,
                delivered = delivered,
                duplicates = duplicates,
                "Finished paging"
            );

            if !self.follow {
                sort_by_creation_time(&mut pending);
                for event in pending {
                    self.send(event).await?;
                }
                return Ok(());
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(ReaderError::Cancelled),
                _ = self.events.closed() => return Err(ReaderError::Cancelled),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Stream names to restrict the filter call to; empty spans the group.
    async fn resolve_streams(&mut self) -> Result<Vec<String>, ReaderError> {
        if let Some(names) = &self.state.streams {
            return Ok(names.clone());
        }

        let names = match self.state.prefix.as_deref() {
            Some(prefix) => {
                let streams = self.guarded_discovery(prefix).await?;
                streams.into_iter().map(|s| s.name).collect()
            }
            None => Vec::new(),
        };

        self.state.streams = Some(names.clone());
        Ok(names)
    }

    async fn guarded_discovery(
        &self,
        prefix: &str,
    ) -> Result<Vec<LogStreamDescriptor>, ReaderError> {
        let discovery = discover(
            self.service.as_ref(),
            &self.state.group,
            Some(prefix),
            &self.state.window,
            self.max_streams,
        );
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ReaderError::Cancelled),
            _ = self.events.closed() => Err(ReaderError::Cancelled),
            result = discovery => result,
        }
    }

    /// Run a remote call unless the consumer goes away first.
    async fn guarded<F, T>(&self, call: F) -> Result<T, ReaderError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ReaderError::Cancelled),
            _ = self.events.closed() => Err(ReaderError::Cancelled),
            result = call => result.map_err(ReaderError::from),
        }
    }

    async fn send(&self, event: LogEvent) -> Result<(), ReaderError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ReaderError::Cancelled),
            result = self.events.send(event) => result.map_err(|_| ReaderError::Cancelled),
        }
    }
}

/// Consuming end of a reader's event stream.
pub struct EventStream {
    events: mpsc::Receiver<LogEvent>,
    terminal: Arc<OnceLock<ReaderError>>,
    cancel: CancellationToken,
    closed: bool,
}

impl EventStream {
    /// Next event, or `None` once the producer has finished.
    pub async fn recv(&mut self) -> Option<LogEvent> {
        let event = self.events.recv().await;
        if event.is_none() {
            self.closed = true;
        }
        event
    }

    /// Ask the producer to stop. Already buffered events can still be received.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Why the stream ended, if not by running out of pages.
    ///
    /// Only meaningful once `recv` has returned `None`.
    pub fn error(&self) -> Option<&ReaderError> {
        self.terminal.get()
    }

    /// `Ok` for exhaustion and cancellation, the failure otherwise.
    pub fn result(&self) -> Result<(), ReaderError> {
        match self.error() {
            None | Some(ReaderError::Cancelled) => Ok(()),
            Some(e) => Err(e.clone()),
        }
    }

    /// Receive every remaining event; any terminal error, cancellation
    /// included, replaces the events.
    pub async fn drain(mut self) -> Result<Vec<LogEvent>, ReaderError> {
        let mut events = Vec::new();
        while let Some(event) = self.recv().await {
            events.push(event);
        }
        match self.error() {
            Some(e) => Err(e.clone()),
            None => Ok(events),
        }
    }
}

impl futures::Stream for EventStream {
    type Item = LogEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let poll = self.events.poll_recv(cx);
        if let Poll::Ready(None) = poll {
            self.closed = true;
        }
        poll
    }
}
