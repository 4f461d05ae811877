//! Directory-backed workbook
//!
//! Every worksheet is a `<name>.csv` file in the workbook directory.
//! CSV has no notion of tables, so table definitions live for the lifetime
//! of the `CsvWorkbook` value and always reflect the sheet's current file.

use super::types::{overlay, Grid, Table, Workbook, Worksheet};
use crate::error::{Error, Result, ResultExt};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workbook stored as a directory of CSV files
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    root: PathBuf,
    /// Table name -> worksheet name
    tables: BTreeMap<String, String>,
}

impl CsvWorkbook {
    /// Open a workbook directory
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::workbook(format!(
                "'{}' is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
            tables: BTreeMap::new(),
        })
    }

    /// File backing a worksheet
    pub fn sheet_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
        {
            return Err(Error::invalid_value(
                "worksheet",
                format!("'{name}' is not a valid worksheet name"),
            ));
        }
        Ok(self.root.join(format!("{name}.csv")))
    }

    fn read_grid(path: &Path) -> Result<Grid> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }
        Ok(rows)
    }

    fn write_grid(path: &Path, rows: &Grid) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Workbook for CsvWorkbook {
    fn worksheet(&self, name: &str) -> Result<Option<Worksheet>> {
        let path = self.sheet_path(name)?;
        if !path.is_file() {
            return Ok(None);
        }
        let cells = Self::read_grid(&path)
            .with_context(|| format!("Failed to read worksheet '{name}'"))?;
        debug!(sheet = name, rows = cells.len(), "Read worksheet");
        Ok(Some(Worksheet::new(name, cells)))
    }

    fn add_worksheet(&mut self, name: &str) -> Result<Worksheet> {
        if let Some(existing) = self.worksheet(name)? {
            return Ok(existing);
        }
        let path = self.sheet_path(name)?;
        File::create(&path).context(format!("Failed to create worksheet '{name}'"))?;
        Ok(Worksheet::new(name, Grid::new()))
    }

    fn tables(&self, worksheet: &str) -> Result<Vec<String>> {
        Ok(self
            .tables
            .iter()
            .filter(|(_, sheet)| sheet.as_str() == worksheet)
            .map(|(table, _)| table.clone())
            .collect())
    }

    fn table(&self, name: &str) -> Result<Option<Table>> {
        let Some(sheet) = self.tables.get(name) else {
            return Ok(None);
        };
        let worksheet = self
            .worksheet(sheet)?
            .ok_or_else(|| Error::WorksheetNotFound {
                name: sheet.clone(),
            })?;
        Ok(Some(Table::from_worksheet(name, &worksheet)))
    }

    fn add_table(&mut self, worksheet: &Worksheet, name: &str) -> Result<Table> {
        if let Some(existing) = self.tables.get(name) {
            if existing != worksheet.name() {
                return Err(Error::workbook(format!(
                    "table '{name}' already exists on worksheet '{existing}'"
                )));
            }
        }
        self.tables
            .insert(name.to_string(), worksheet.name().to_string());
        Ok(Table::from_worksheet(name, worksheet))
    }

    fn write_range(&mut self, worksheet: &str, rows: &[Vec<String>]) -> Result<()> {
        let path = self.sheet_path(worksheet)?;
        let mut cells = if path.is_file() {
            Self::read_grid(&path)?
        } else {
            Grid::new()
        };
        overlay(&mut cells, rows);
        Self::write_grid(&path, &cells)
            .with_context(|| format!("Failed to write worksheet '{worksheet}'"))
    }
}
