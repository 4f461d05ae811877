//! CLI module
//!
//! Command-line interface for ingest runs.
//!
//! # Commands
//!
//! - `run` - Upload the data table and write the upload log
//! - `plan` - Show the batch layout without sending anything
//! - `config` - Print the resolved configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
