use lru::LruCache;
use std::num::NonZeroUsize;

/// Maximum number of events a single filter call returns.
pub const MAX_EVENTS_PER_CALL: usize = 10_000;

/// Remembers recently delivered event ids.
///
/// Sized to one filter call: once that many newer events have been seen, an
/// id can no longer come back through an overlapping page or poll.
pub struct EventDeduplicator {
    seen: LruCache<String, ()>,
}

impl EventDeduplicator {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            seen: LruCache::new(capacity),
        }
    }

    /// Returns true if `id` was already seen; records it otherwise.
    pub fn seen(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return true;
        }
        self.seen.put(id.to_string(), ());
        false
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.seen.cap().get()
    }
}

impl Default for EventDeduplicator {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(MAX_EVENTS_PER_CALL).unwrap_or(NonZeroUsize::MIN))
    }
}
