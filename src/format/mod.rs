pub mod color;
pub mod template;

use crate::event::{EventError, LogEvent};
use chrono::{DateTime, Local, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

pub use color::ColorRegistry;
pub use template::{Field, Segment, Template, DEFAULT_TEMPLATE, VERBOSE_TEMPLATE};

pub const SHORT_TIME_FORMAT: &str = "%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("unknown placeholder '{{{0}}}'")]
    UnknownPlaceholder(String),

    #[error("failed to encode event: {0}")]
    Json(#[from] serde_json::Error),
}

fn task_uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[[:alnum:]]{8}-[[:alnum:]]{4}-[[:alnum:]]{4}-[[:alnum:]]{4}-[[:alnum:]]{12}$")
            .unwrap()
    })
}

/// First segment of a UUID stream name; other names pass through.
pub fn task_short(stream: &str) -> &str {
    if task_uuid_pattern().is_match(stream) {
        stream.split('-').next().unwrap_or(stream)
    } else {
        stream
    }
}

pub fn time_short(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(SHORT_TIME_FORMAT).to_string()
}

/// Flatten nested objects into dotted keys, sorted by key.
pub fn flatten_data(data: &Map<String, Value>) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    flatten_into(&mut flat, None, data);
    flat
}

fn flatten_into(flat: &mut BTreeMap<String, String>, prefix: Option<&str>, data: &Map<String, Value>) {
    for (key, value) in data {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => flatten_into(flat, Some(&path), nested),
            other => {
                flat.insert(path, value_text(other));
            }
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn errors_text(errors: &[EventError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = errors
        .iter()
        .map(|e| {
            let mut part = format!("Type={} Error={}", e.kind, e.message);
            if let Some(stack) = &e.stack {
                part.push_str(&format!(" Stack={}", value_text(stack)));
            }
            part
        })
        .collect();
    format!(" Errors=[{}]", parts.join(" "))
}

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Template(Template),
    /// Pretty-printed JSON of the whole event.
    Raw,
}

/// Turns events into printable lines.
#[derive(Debug)]
pub struct Formatter {
    format: OutputFormat,
    colors: ColorRegistry,
}

impl Formatter {
    pub fn new(format: OutputFormat, colors: ColorRegistry) -> Self {
        Self { format, colors }
    }

    pub fn render(&mut self, event: &LogEvent) -> Result<String, FormatError> {
        let template = match &self.format {
            OutputFormat::Raw => return Ok(serde_json::to_string_pretty(event)?),
            OutputFormat::Template(template) => template,
        };

        let mut out = String::new();
        for segment in template.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => match field {
                    Field::Task => out.push_str(&self.colors.unique(task_short(&event.stream))),
                    Field::Stream => out.push_str(&event.stream),
                    Field::Group => out.push_str(&event.group),
                    Field::Id => out.push_str(&event.id),
                    Field::Time => out.push_str(&time_short(event.timestamp())),
                    Field::Level => out.push_str(&self.colors.level(event.level())),
                    Field::Message => out.push_str(event.message()),
                    Field::Data => {
                        for (key, value) in flatten_data(&event.payload.data) {
                            out.push_str(&format!(" {key}={value}"));
                        }
                    }
                    Field::Errors => out.push_str(&errors_text(event.payload.errors())),
                },
            }
        }
        Ok(out)
    }
}
