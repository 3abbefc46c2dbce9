use super::resolve_config_path;
use super::types::*;
use crate::format::Template;
use crate::reader::{MAX_EVENTS_PER_CALL, MAX_STREAMS};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml_string = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    let config = parse_config(&yaml_string).map_err(|e| match e {
        ConfigError::YamlParse(e) => ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("in file '{}': {}", path.display(), e),
        )),
        other => other,
    })?;

    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Parse and validate a YAML document. An empty document yields the defaults.
pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    let config: Config = if yaml.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    validate_config(&config)?;
    Ok(config)
}

/// Load the config from the first location that exists, or use the defaults
/// when there is none. An explicit path must exist.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match resolve_config_path(explicit) {
        Some(path) => load_config(&path),
        None => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.reader.poll_interval.is_zero() {
        errors.push("reader.poll_interval must be greater than zero".to_string());
    }
    if config.reader.channel_capacity == 0 {
        errors.push("reader.channel_capacity must be at least 1".to_string());
    }
    if config.reader.dedup_capacity == 0 || config.reader.dedup_capacity > MAX_EVENTS_PER_CALL * 10 {
        errors.push(format!(
            "reader.dedup_capacity must be between 1 and {}",
            MAX_EVENTS_PER_CALL * 10
        ));
    }
    if config.reader.max_streams == 0 || config.reader.max_streams > MAX_STREAMS {
        errors.push(format!(
            "reader.max_streams must be between 1 and {}",
            MAX_STREAMS
        ));
    }
    if let Some(format) = &config.output.format {
        if let Err(e) = Template::parse(format) {
            errors.push(format!("output.format: {}", e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}
