//! logtint - colored, indented and filterable logcat viewer
//!
//! This library provides the line pipeline behind the `lt` binary: record
//! parsing, tag color allocation, wrapping, and the level/grep filter with
//! trailing context.

pub mod args;
pub mod colors;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod input;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod rules;
pub mod settings;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::FilterConfig;
pub use error::Error;
pub use pipeline::{Session, StopReason};
pub use record::{Record, Severity};
pub use settings::Settings;
