//! Muster CLI library.
//!
//! This library provides the command-line surface around the extractor:
//! configuration management, the JSON page-dump backend, document
//! acquisition, output documents, and output formatting.

pub mod acquire;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod metadata;
pub mod output;
pub mod pages;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use pages::JsonDocument;
