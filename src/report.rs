//! Upload log
//!
//! One entry per batch attempt, appended in upload order and written to the
//! log worksheet once the run is over.

use crate::error::Result;
use crate::format::{format_bytes, format_duration};
use crate::workbook::Workbook;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::info;

/// Column headers of the log worksheet
pub const LOG_HEADERS: [&str; 9] = [
    "Start Time",
    "End Time",
    "Time Diff",
    "UTF8 Byte Size",
    "Record Starts At",
    "Record Ends At",
    "Items Uploaded",
    "Response Code",
    "Response Message",
];

/// Decimal places of the elapsed-time column
pub const DURATION_PRECISION: usize = 8;

/// RFC 1123 rendering used for the time columns
const TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Outcome of one batch upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the batch started
    pub start_time: DateTime<Utc>,
    /// When the reply (or failure) arrived
    pub end_time: DateTime<Utc>,
    /// Wall-clock time spent on the batch
    pub elapsed: Duration,
    /// UTF-8 length of the JSON payload
    pub byte_size: u64,
    /// First row index in the batch
    pub starts_at: usize,
    /// Last row index in the batch
    pub ends_at: usize,
    /// Records in the batch
    pub count: usize,
    /// Reported status code, 0 when no reply was received
    pub code: u16,
    /// Reported message, or the failure text
    pub message: String,
}

impl LogEntry {
    /// Whether the batch was accepted
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Render as a log worksheet row
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.start_time.format(TIME_FORMAT).to_string(),
            self.end_time.format(TIME_FORMAT).to_string(),
            format_duration(self.elapsed.as_secs_f64() * 1000.0, DURATION_PRECISION),
            format_bytes(self.byte_size),
            self.starts_at.to_string(),
            self.ends_at.to_string(),
            self.count.to_string(),
            self.code.to_string(),
            self.message.clone(),
        ]
    }
}

/// Append-only list of log entries
#[derive(Debug, Clone, Default)]
pub struct UploadLog {
    entries: Vec<LogEntry>,
}

impl UploadLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// All entries, in upload order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header row followed by one row per entry
    pub fn rows(&self) -> Vec<Vec<String>> {
        std::iter::once(LOG_HEADERS.iter().map(ToString::to_string).collect::<Vec<_>>())
            .chain(self.entries.iter().map(LogEntry::to_row))
            .collect()
    }

    /// Write the log into `sheet`, creating the worksheet if needed
    pub fn save(&self, workbook: &mut dyn Workbook, sheet: &str) -> Result<()> {
        if workbook.worksheet(sheet)?.is_some() {
            info!("Found the {sheet} worksheet");
        } else {
            info!("Adding the log worksheet named {sheet}");
            workbook.add_worksheet(sheet)?;
        }

        workbook.write_range(sheet, &self.rows())?;
        info!(entries = self.entries.len(), "Saved upload log to {sheet}");
        Ok(())
    }
}
