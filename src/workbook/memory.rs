//! In-process workbook

use super::types::{overlay, Grid, Table, Workbook, Worksheet};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Workbook held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: BTreeMap<String, Grid>,
    /// Table name -> worksheet name
    tables: BTreeMap<String, String>,
}

impl MemoryWorkbook {
    /// Create an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet with the given cells
    #[must_use]
    pub fn with_sheet(mut self, name: impl Into<String>, cells: Grid) -> Self {
        self.sheets.insert(name.into(), cells);
        self
    }

    /// Add a worksheet with a table of the same name over its used range
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, cells: Grid) -> Self {
        let name = name.into();
        self.sheets.insert(name.clone(), cells);
        self.tables.insert(name.clone(), name);
        self
    }

    /// Raw cells of a worksheet
    pub fn cells(&self, name: &str) -> Option<&Grid> {
        self.sheets.get(name)
    }
}

impl Workbook for MemoryWorkbook {
    fn worksheet(&self, name: &str) -> Result<Option<Worksheet>> {
        Ok(self
            .sheets
            .get(name)
            .map(|cells| Worksheet::new(name, cells.clone())))
    }

    fn add_worksheet(&mut self, name: &str) -> Result<Worksheet> {
        let cells = self.sheets.entry(name.to_string()).or_default();
        Ok(Worksheet::new(name, cells.clone()))
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
        if !self.sheets.contains_key(worksheet.name()) {
            return Err(Error::WorksheetNotFound {
                name: worksheet.name().to_string(),
            });
        }
        self.tables
            .insert(name.to_string(), worksheet.name().to_string());
        Ok(Table::from_worksheet(name, worksheet))
    }

    fn write_range(&mut self, worksheet: &str, rows: &[Vec<String>]) -> Result<()> {
        let cells = self
            .sheets
            .get_mut(worksheet)
            .ok_or_else(|| Error::WorksheetNotFound {
                name: worksheet.to_string(),
            })?;
        overlay(cells, rows);
        Ok(())
    }
}
