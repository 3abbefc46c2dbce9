pub mod config;
pub mod fetch;
pub mod list;

use crate::config::ConfigError;
use crate::format::FormatError;
use crate::reader::ReaderError;
use crate::time::TimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Reader(#[from] ReaderError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("config file already exists at {0}")]
    ConfigExists(String),

    #[error("could not determine a home directory for the config file")]
    NoHomeDir,
}
