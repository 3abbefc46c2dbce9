pub mod cli;
pub mod config;
pub mod event;
pub mod format;
pub mod reader;
pub mod remote;
pub mod time;
