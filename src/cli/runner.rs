//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::http::IngestClient;
use crate::uploader::{self, load_table, plan_batches};
use crate::workbook::CsvWorkbook;
use serde_json::json;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load the configuration file (or defaults) and apply flag overrides
    pub fn load_config(&self) -> Result<IngestConfig> {
        let mut config = match &self.cli.config {
            Some(path) => IngestConfig::from_file(path)?,
            None => IngestConfig::default(),
        };

        let cli = &self.cli;
        if let Some(workbook) = &cli.workbook {
            config.workbook.clone_from(workbook);
        }
        if let Some(sheet) = &cli.sheet {
            config.data_worksheet.clone_from(sheet);
        }
        if let Some(sheet) = &cli.log_sheet {
            config.log_worksheet.clone_from(sheet);
        }
        if let Some(start) = cli.start {
            config.item_start = start;
        }
        if let Some(max_items) = cli.max_items {
            config.max_items = max_items;
        }
        if let Some(batch_size) = cli.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(id) = &cli.environment_id {
            config.destination.environment_id.clone_from(id);
        }
        if let Some(token) = &cli.api_token {
            config.destination.api_token.clone_from(token);
        }
        if let Some(endpoint) = &cli.endpoint {
            config.destination.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = cli.timeout {
            config.destination.timeout_secs = Some(timeout);
        }
        if cli.quiet {
            config.verbose = false;
        }

        Ok(config)
    }

    /// Run the CLI command
    pub async fn run(&self, config: IngestConfig) -> Result<()> {
        match self.cli.command {
            Commands::Run => self.upload(&config).await,
            Commands::Plan => self.plan(&config),
            Commands::Config => self.show_config(&config),
        }
    }

    /// Upload the data table
    async fn upload(&self, config: &IngestConfig) -> Result<()> {
        config.validate()?;

        let mut workbook = CsvWorkbook::open(&config.workbook)?;
        let client = IngestClient::with_config(config.client_config()?)?;
        info!("Calling API using {}", client.config().endpoint);

        let report = uploader::run(config, &mut workbook, &client).await?;

        println!(
            "{}",
            json!({
                "found_data": report.found_data,
                "table_rows": report.table_rows,
                "batches": report.summary.batches,
                "records_sent": report.summary.records_sent,
                "failed_batches": report.summary.failed_batches,
            })
        );

        if report.summary.failed_batches > 0 {
            return Err(Error::Other(format!(
                "{} of {} batches failed, see the {} worksheet",
                report.summary.failed_batches, report.summary.batches, config.log_worksheet
            )));
        }
        Ok(())
    }

    /// Print the batch layout of the data table
    fn plan(&self, config: &IngestConfig) -> Result<()> {
        let mut workbook = CsvWorkbook::open(&config.workbook)?;
        let table = load_table(config, &mut workbook)?.ok_or_else(|| Error::TableNotFound {
            name: config.data_worksheet.clone(),
        })?;
        let plan = plan_batches(config, &table)?;

        let batches: Vec<_> = plan
            .batches()
            .map(|range| {
                json!({
                    "starts_at": range.start,
                    "ends_at": range.end - 1,
                    "count": range.len(),
                })
            })
            .collect();

        let output = json!({
            "table": table.name(),
            "table_rows": table.row_count(),
            "selected": plan.selected(),
            "batch_size": plan.batch_size(),
            "batches": batches,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Print the resolved configuration
    fn show_config(&self, config: &IngestConfig) -> Result<()> {
        print!("{}", serde_yaml::to_string(&config.masked())?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("sheet-ingest").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = Runner::new(cli(&["config"])).load_config().unwrap();
        assert_eq!(config.data_worksheet, "Sheet1");
        assert_eq!(config.batch_size, 1000);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ingest.yaml");
        fs::write(
            &path,
            "data_worksheet: Tickets\nbatch_size: 50\nmax_items: 10\n",
        )
        .unwrap();

        let config = Runner::new(cli(&[
            "-c",
            path.to_str().unwrap(),
            "--batch-size",
            "25",
            "--log-sheet",
            "UploadLog",
            "--endpoint",
            "http://localhost:1234/ingest",
            "--quiet",
            "run",
        ]))
        .load_config()
        .unwrap();

        assert_eq!(config.data_worksheet, "Tickets");
        assert_eq!(config.max_items, 10);
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.log_worksheet, "UploadLog");
        assert_eq!(
            config.destination.endpoint.as_deref(),
            Some("http://localhost:1234/ingest")
        );
        assert!(!config.verbose);
    }

    #[test]
    fn test_subcommand_parsing() {
        assert_eq!(cli(&["run"]).command, Commands::Run);
        assert_eq!(cli(&["plan", "--start", "2"]).command, Commands::Plan);
        assert_eq!(cli(&["plan", "--start", "2"]).start, Some(2));
    }
}
