pub mod duration;
pub mod resolve;

pub use duration::{parse_signed_duration, DurationError};
pub use resolve::{resolve, resolve_now, TimeError, ALL, NOW};
