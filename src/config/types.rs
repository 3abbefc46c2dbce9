use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub aws: AwsConfig,
    pub reader: ReaderConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    pub channel_capacity: usize,
    pub dedup_capacity: usize,
    pub max_streams: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            channel_capacity: 1,
            dedup_capacity: 10_000,
            max_streams: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub color: bool,
    /// Template used by `fetch` when `--format` is not given.
    pub format: Option<String>,
    /// How long a bounded fetch may go without output before a hint is printed.
    #[serde(with = "humantime_serde")]
    pub slow_warning: Duration,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            format: None,
            slow_warning: Duration::from_secs(7),
        }
    }
}
