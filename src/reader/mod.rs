pub mod dedup;
pub mod discovery;
pub mod error;
pub mod stream;
pub mod window;

pub use dedup::{EventDeduplicator, MAX_EVENTS_PER_CALL};
pub use discovery::{discover, sort_by_last_event, MAX_STREAMS};
pub use error::{ReaderError, MAX_GROUP_SUGGESTIONS};
pub use stream::{EventStream, LogReader, ReaderOptions, DEFAULT_POLL_INTERVAL};
pub use window::TimeWindow;
