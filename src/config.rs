//! Run configuration
//!
//! Loaded from YAML, every field optional. Defaults reproduce the classic
//! SMAX ticket export: rows from `Sheet1` (header skipped), batches of 1000,
//! results written to `Logs`.

use crate::error::{Error, Result};
use crate::http::IngestClientConfig;
use crate::record::{RecordMapper, DEFAULT_SOURCE_FIELD, DEFAULT_SOURCE_TAG, SMAX_FIELDS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration of an ingest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Workbook directory
    pub workbook: PathBuf,

    /// Worksheet (and table) holding the records
    pub data_worksheet: String,

    /// Worksheet receiving the upload log
    pub log_worksheet: String,

    /// Index of the first row to send; 1 skips the header row
    pub item_start: usize,

    /// Maximum rows to send, 0 for all
    pub max_items: usize,

    /// Maximum rows per request
    pub batch_size: usize,

    /// Where records are sent
    pub destination: DestinationConfig,

    /// How rows become records
    pub records: RecordsConfig,

    /// Log progress messages
    pub verbose: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("."),
            data_worksheet: "Sheet1".to_string(),
            log_worksheet: "Logs".to_string(),
            item_start: 1,
            max_items: 0,
            batch_size: 1000,
            destination: DestinationConfig::default(),
            records: RecordsConfig::default(),
            verbose: true,
        }
    }
}

impl IngestConfig {
    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file '{}': {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Check the settings a run cannot proceed without
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::invalid_value(
                "batch_size",
                "must be greater than zero",
            ));
        }
        if self.data_worksheet.is_empty() {
            return Err(Error::missing_field("data_worksheet"));
        }
        if self.log_worksheet.is_empty() {
            return Err(Error::missing_field("log_worksheet"));
        }
        if self.records.source_field.is_empty() {
            return Err(Error::missing_field("records.source_field"));
        }
        self.destination.validate()
    }

    /// Build the ingest client configuration
    pub fn client_config(&self) -> Result<IngestClientConfig> {
        self.destination.client_config()
    }

    /// Build the row-to-record mapper
    pub fn mapper(&self) -> RecordMapper {
        RecordMapper::new(
            self.records.fields.clone(),
            self.records.source_field.as_str(),
            self.records.source_tag.as_str(),
        )
    }

    /// Copy with the API token hidden, for display
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        if !config.destination.api_token.is_empty() {
            config.destination.api_token = "***".to_string();
        }
        config
    }
}

// ============================================================================
// Destination
// ============================================================================

/// Dynatrace environment and credentials
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    /// First label of `https://{id}.live.dynatrace.com`
    pub environment_id: String,

    /// API token with the `logs.ingest` scope
    pub api_token: String,

    /// Full ingest URL, overriding `environment_id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds; unset keeps the HTTP client default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl DestinationConfig {
    /// Check that the destination is addressable and authenticated
    pub fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(Error::missing_field("destination.api_token"));
        }
        match &self.endpoint {
            Some(endpoint) => {
                Url::parse(endpoint)?;
            }
            None if self.environment_id.is_empty() => {
                return Err(Error::missing_field("destination.environment_id"));
            }
            None => {}
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::invalid_value(
                "destination.timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Build the ingest client configuration
    pub fn client_config(&self) -> Result<IngestClientConfig> {
        let mut config = match &self.endpoint {
            Some(endpoint) => {
                IngestClientConfig::with_endpoint(Url::parse(endpoint)?, self.api_token.as_str())
            }
            None => IngestClientConfig::for_environment(&self.environment_id, self.api_token.as_str())?,
        };
        if let Some(secs) = self.timeout_secs {
            config = config.timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

impl std::fmt::Debug for DestinationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationConfig")
            .field("environment_id", &self.environment_id)
            .field("api_token", &"***")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// ============================================================================
// Records
// ============================================================================

/// Positional field mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Field name of each column, in order
    pub fields: Vec<String>,

    /// Field force-set on every record
    pub source_field: String,

    /// Value of the source field
    pub source_tag: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            fields: SMAX_FIELDS.iter().map(ToString::to_string).collect(),
            source_field: DEFAULT_SOURCE_FIELD.to_string(),
            source_tag: DEFAULT_SOURCE_TAG.to_string(),
        }
    }
}
