//! # sheet-ingest
//!
//! Batch worksheet rows into the Dynatrace log ingest API and keep a
//! per-batch record of every upload.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheet_ingest::{config::IngestConfig, http::IngestClient, uploader, workbook::CsvWorkbook};
//!
//! #[tokio::main]
//! async fn main() -> sheet_ingest::Result<()> {
//!     let config = IngestConfig::from_file("ingest.yaml")?;
//!     config.validate()?;
//!
//!     let mut workbook = CsvWorkbook::open(&config.workbook)?;
//!     let client = IngestClient::with_config(config.client_config()?)?;
//!
//!     let report = uploader::run(&config, &mut workbook, &client).await?;
//!     println!("{} batches, {} failed", report.summary.batches, report.summary.failed_batches);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   rows    ┌───────────┐  JSON   ┌──────────────┐
//! │ Workbook │ ────────► │ Uploader  │ ──────► │ Ingest API   │
//! │  (CSV)   │           │ plan/map  │ ◄────── │ POST /logs   │
//! └──────────┘           └───────────┘  reply  └──────────────┘
//!       ▲                      │
//!       └──── upload log ──────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Run configuration
pub mod config;

/// Tabular host documents
pub mod workbook;

/// Row to record mapping
pub mod record;

/// Batch planning
pub mod batch;

/// Log ingest HTTP client
pub mod http;

/// Byte and duration formatting
pub mod format;

/// Upload log entries
pub mod report;

/// Batch upload and run pipeline
pub mod uploader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
