//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Send worksheet rows to the Dynatrace log ingest API
#[derive(Parser, Debug)]
#[command(name = "sheet-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Workbook directory (one CSV file per worksheet)
    #[arg(short, long, global = true)]
    pub workbook: Option<PathBuf>,

    /// Worksheet holding the records
    #[arg(long, global = true)]
    pub sheet: Option<String>,

    /// Worksheet receiving the upload log
    #[arg(long, global = true)]
    pub log_sheet: Option<String>,

    /// First row to send (1 skips the header row)
    #[arg(long, global = true)]
    pub start: Option<usize>,

    /// Maximum rows to send (0 = all)
    #[arg(long, global = true)]
    pub max_items: Option<usize>,

    /// Rows per request
    #[arg(short, long, global = true)]
    pub batch_size: Option<usize>,

    /// Dynatrace environment id (`https://{id}.live.dynatrace.com`)
    #[arg(long, global = true, env = "DT_ENVIRONMENT_ID")]
    pub environment_id: Option<String>,

    /// API token with the logs.ingest scope
    #[arg(long, global = true, env = "DT_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Full ingest URL, overriding the environment id
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Upload the data table and write the upload log
    Run,

    /// Show how the data table would be batched, without sending anything
    Plan,

    /// Print the resolved configuration (token masked)
    Config,
}
