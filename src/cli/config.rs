use super::CliError;
use crate::config::generate::generate_starter_config;
use crate::config::{load_config, resolve_config_path, user_config_path};
use std::fs;
use std::path::{Path, PathBuf};

/// Print the starter config, or write it to `target` (default
/// `~/.config/cwlogs/config.yml`).
pub fn init(stdout: bool, target: Option<&Path>) -> Result<(), CliError> {
    let config_content = generate_starter_config();

    if stdout {
        print!("{}", config_content);
        return Ok(());
    }

    let config_path = match target {
        Some(path) => crate::config::expand_tilde(path),
        None => user_config_path().ok_or(CliError::NoHomeDir)?,
    };
    write_config(&config_content, &config_path)?;

    println!("Config file written to {}", config_path.display());
    Ok(())
}

/// Write `content` to `path`, creating parent directories. An existing file
/// is never overwritten.
pub fn write_config(content: &str, path: &Path) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::ConfigExists(path.display().to_string()));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn validate(explicit: Option<PathBuf>) -> Result<(), CliError> {
    let Some(path) = resolve_config_path(explicit.as_deref()) else {
        println!("No config file found; defaults are in effect");
        return Ok(());
    };

    println!("Validating config file: {}", path.display());
    load_config(&path)?;
    println!("✓ Config is valid");
    Ok(())
}
