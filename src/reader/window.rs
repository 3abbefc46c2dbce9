use chrono::{DateTime, Utc};

/// The time range a reader covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    /// `None` tracks the current time.
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn open_ended(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    /// Fix an unset end at `now` so a bounded query has a reproducible upper bound.
    pub fn pinned(self, now: DateTime<Utc>) -> Self {
        Self {
            start: self.start,
            end: Some(self.end.unwrap_or(now)),
        }
    }

    /// Whether something created at `created` can hold events inside the window.
    pub fn admits_creation(&self, created: DateTime<Utc>) -> bool {
        self.end.map_or(true, |end| created <= end)
    }
}
