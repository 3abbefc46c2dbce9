use super::FormatError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const DEFAULT_TEMPLATE: &str = "[ {task} ] {time} {level} - {message}";
pub const VERBOSE_TEMPLATE: &str = "[ {task} ] {time} {level}{data}{errors} - {message}";

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(\w+)\}").unwrap())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Task,
    Stream,
    Group,
    Id,
    Time,
    Level,
    Message,
    Data,
    Errors,
}

impl FromStr for Field {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(Field::Task),
            "stream" => Ok(Field::Stream),
            "group" => Ok(Field::Group),
            "id" => Ok(Field::Id),
            "time" => Ok(Field::Time),
            "level" => Ok(Field::Level),
            "message" => Ok(Field::Message),
            "data" => Ok(Field::Data),
            "errors" => Ok(Field::Errors),
            other => Err(FormatError::UnknownPlaceholder(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed output template such as `[ {task} ] {time} - {message}`.
///
/// Text outside `{name}` placeholders is copied through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in placeholder_pattern().captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(source[last..whole.start()].to_string()));
            }
            segments.push(Segment::Field(name.as_str().parse()?));
            last = whole.end();
        }
        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for Template {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
            segments: vec![
                Segment::Literal("[ ".into()),
                Segment::Field(Field::Task),
                Segment::Literal(" ] ".into()),
                Segment::Field(Field::Time),
                Segment::Literal(" ".into()),
                Segment::Field(Field::Level),
                Segment::Literal(" - ".into()),
                Segment::Field(Field::Message),
            ],
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
