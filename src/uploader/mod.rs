//! Batch uploader
//!
//! Drives a run end to end: read the data table, split the selected rows
//! into batches, send each batch in turn and write the upload log.
//!
//! # Failure handling
//!
//! A failed request never stops the run. The failure is recorded in that
//! batch's log entry and the next batch is sent as usual. There is no
//! retry: every batch is attempted exactly once.

use crate::batch::BatchPlan;
use crate::config::IngestConfig;
use crate::error::Result;
use crate::http::LogIngest;
use crate::record::RecordMapper;
use crate::report::{LogEntry, UploadLog};
use crate::workbook::{Table, Workbook};
use chrono::Utc;
use std::ops::Range;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Counters for one upload pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// Batches attempted
    pub batches: usize,
    /// Records in batches that were accepted
    pub records_sent: usize,
    /// Batches that failed
    pub failed_batches: usize,
}

/// Sends planned batches one at a time
pub struct BatchUploader<'a> {
    ingest: &'a dyn LogIngest,
    mapper: &'a RecordMapper,
}

impl<'a> BatchUploader<'a> {
    /// Create an uploader
    pub fn new(ingest: &'a dyn LogIngest, mapper: &'a RecordMapper) -> Self {
        Self { ingest, mapper }
    }

    /// Upload every batch of `plan`, appending one entry per batch to `log`
    pub async fn upload(
        &self,
        rows: &[Vec<String>],
        plan: &BatchPlan,
        log: &mut UploadLog,
    ) -> UploadSummary {
        let mut summary = UploadSummary::default();

        for range in plan.batches() {
            let entry = self.upload_batch(rows, range).await;

            summary.batches += 1;
            if entry.is_success() {
                summary.records_sent += entry.count;
            } else {
                summary.failed_batches += 1;
            }
            log.push(entry);
        }

        summary
    }

    async fn upload_batch(&self, rows: &[Vec<String>], range: Range<usize>) -> LogEntry {
        let start_time = Utc::now();
        let started = Instant::now();

        let batch = rows.get(range.clone()).unwrap_or_default();
        let records = self.mapper.map_rows(batch);
        let count = records.len();

        let entry = |byte_size: u64, code: u16, message: String| LogEntry {
            start_time,
            end_time: Utc::now(),
            elapsed: started.elapsed(),
            byte_size,
            starts_at: range.start,
            ends_at: range.end.saturating_sub(1),
            count,
            code,
            message,
        };

        let payload = match serde_json::to_string(&records) {
            Ok(payload) => payload,
            Err(e) => return entry(0, 0, e.to_string()),
        };
        let byte_size = payload.len() as u64;

        info!(
            "Sending {count} items (rows {}..={}) to {}",
            range.start,
            range.end.saturating_sub(1),
            self.ingest.endpoint()
        );

        match self.ingest.ingest(payload).await {
            Ok(response) => {
                info!("API response: {}", response.status);
                entry(byte_size, response.code, response.message)
            }
            Err(e) => {
                warn!("Batch rows {}..{} failed: {e}", range.start, range.end);
                entry(byte_size, e.status_code().unwrap_or(0), e.to_string())
            }
        }
    }
}

/// Result of a full run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Whether the data worksheet and table were found
    pub found_data: bool,
    /// Data rows in the table, header excluded
    pub table_rows: usize,
    /// Upload counters
    pub summary: UploadSummary,
    /// Entries written to the log worksheet
    pub log: UploadLog,
}

/// Find the data table, creating it over the worksheet's used range if the
/// worksheet has none. Returns `None` when there is nothing to read.
pub fn load_table(config: &IngestConfig, workbook: &mut dyn Workbook) -> Result<Option<Table>> {
    let name = config.data_worksheet.as_str();

    let Some(worksheet) = workbook.worksheet(name)? else {
        warn!("Please check the named sheet, it was not found using {name}");
        return Ok(None);
    };
    info!("Found the {name} worksheet");

    if workbook.tables(name)?.is_empty() {
        info!("No tables were found, creating the table and naming it {name}");
        workbook.add_table(&worksheet, name)?;
    }

    match workbook.table(name)? {
        Some(table) => {
            debug!(
                rows = table.row_count(),
                columns = table.header().map_or(0, <[String]>::len),
                "Found the table"
            );
            Ok(Some(table))
        }
        None => {
            warn!("No tables were found, unable to create the table");
            Ok(None)
        }
    }
}

/// Plan batches over a table's cell grid
pub fn plan_batches(config: &IngestConfig, table: &Table) -> Result<BatchPlan> {
    BatchPlan::new(
        table.texts().len(),
        config.item_start,
        config.max_items,
        config.batch_size,
    )
}

/// Read the data table, upload it batch by batch and save the upload log
pub async fn run(
    config: &IngestConfig,
    workbook: &mut dyn Workbook,
    ingest: &dyn LogIngest,
) -> Result<RunReport> {
    let Some(table) = load_table(config, workbook)? else {
        return Ok(RunReport::default());
    };

    let plan = plan_batches(config, &table)?;
    let mut report = RunReport {
        found_data: true,
        table_rows: table.row_count(),
        ..RunReport::default()
    };

    if table.row_count() == 0 {
        info!("Table {} has no data rows", table.name());
    } else {
        info!(
            selected = plan.selected(),
            batches = plan.batch_count(),
            "Now exporting the table data to JSON"
        );
        let mapper = config.mapper();
        let uploader = BatchUploader::new(ingest, &mapper);
        report.summary = uploader
            .upload(table.texts(), &plan, &mut report.log)
            .await;
    }

    report.log.save(workbook, &config.log_worksheet)?;
    Ok(report)
}
