//! CLI command handlers

pub mod commands;
pub mod prompt;

pub use commands::{download, filename, symbols, DownloadOptions};
pub use prompt::{date_from_arg, prompt_date};
