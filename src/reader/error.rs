use crate::remote::ServiceError;
use thiserror::Error;

/// Number of near-miss group names offered when a lookup fails.
pub const MAX_GROUP_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Error)]
pub enum ReaderError {
    #[error("{}", group_not_found_message(.name, .suggestions))]
    LogGroupNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("{}", no_streams_message(.prefix.as_deref()))]
    NoMatchingStreams { prefix: Option<String> },

    #[error("failed to retrieve logs: {0}")]
    Retrieval(#[from] ServiceError),

    #[error("cancelled by caller")]
    Cancelled,
}

impl ReaderError {
    /// Cancellation ends a stream without the query having failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ReaderError::Cancelled)
    }
}

fn group_not_found_message(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("could not find log group '{name}'");
    if !suggestions.is_empty() {
        message.push_str(".\n\nDid you mean:\n");
        for suggestion in suggestions {
            message.push('\n');
            message.push_str(suggestion);
        }
    }
    message
}

fn no_streams_message(prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!(
            "no log streams matching prefix '{prefix}' have events in the requested time range. \
             Check the prefix, or list available streams with the `list` command."
        ),
        None => "no log streams have events in the requested time range. \
                 Try widening the range with --since."
            .to_string(),
    }
}
