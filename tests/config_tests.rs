use cwlogs::config::{generate::generate_starter_config, load_config, load_or_default, ConfigError};
use cwlogs::reader::ReaderOptions;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_generated_config_is_valid() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yml");

    fs::write(&config_path, generate_starter_config()).unwrap();

    let config = load_config(&config_path).expect("Generated config should be valid");
    assert_eq!(config.reader.poll_interval, Duration::from_secs(5));
    assert_eq!(config.reader.channel_capacity, 1);
    assert_eq!(config.reader.max_streams, 100);
    assert!(config.output.color);
    assert_eq!(config.output.slow_warning, Duration::from_secs(7));
}

#[test]
fn test_full_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yml");

    let config_yaml = r#"
aws:
  region: eu-west-1
  profile: staging

reader:
  poll_interval: 1500ms
  channel_capacity: 64
  dedup_capacity: 5000
  max_streams: 25

output:
  color: false
  format: '{time} {stream} {message}'
  slow_warning: 30s
"#;
    fs::write(&config_path, config_yaml).unwrap();

    let config = load_config(&config_path).unwrap();
    assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.aws.profile.as_deref(), Some("staging"));
    assert!(!config.output.color);
    assert_eq!(config.output.format.as_deref(), Some("{time} {stream} {message}"));
    assert_eq!(config.output.slow_warning, Duration::from_secs(30));

    let options = ReaderOptions::from(&config.reader);
    assert_eq!(options.poll_interval, Duration::from_millis(1500));
    assert_eq!(options.channel_capacity, 64);
    assert_eq!(options.dedup_capacity.get(), 5000);
    assert_eq!(options.max_streams, 25);
}

#[test]
fn test_invalid_values_are_reported_together() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yml");

    let config_yaml = r#"
reader:
  channel_capacity: 0
  dedup_capacity: 0
output:
  format: '{when} {message}'
"#;
    fs::write(&config_path, config_yaml).unwrap();

    match load_config(&config_path) {
        Err(ConfigError::ValidationList(errors)) => {
            assert_eq!(errors.len(), 3);
            assert!(errors.iter().any(|e| e.contains("channel_capacity")));
            assert!(errors.iter().any(|e| e.contains("dedup_capacity")));
            assert!(errors.iter().any(|e| e.contains("{when}")));
        }
        other => panic!("expected validation errors, got {:?}", other),
    }
}

#[test]
fn test_yaml_errors_name_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.yml");
    fs::write(&config_path, "reader: [unclosed\n").unwrap();

    let err = load_config(&config_path).unwrap_err();
    assert!(err.to_string().contains("broken.yml"));
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.yml");

    assert!(matches!(load_or_default(Some(missing.as_path())), Err(ConfigError::Io(_))));
}

#[test]
fn test_explicit_file_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("cwlogs.yml");
    fs::write(&config_path, "reader:\n  poll_interval: 10s\n").unwrap();

    let config = load_or_default(Some(config_path.as_path())).unwrap();
    assert_eq!(config.reader.poll_interval, Duration::from_secs(10));
}
