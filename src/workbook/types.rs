//! Workbook types
//!
//! A workbook is a set of named worksheets, each a grid of cell text.
//! Tables are named views over the used range of a worksheet whose first
//! row is the header.

use crate::error::Result;

/// A 2-D grid of cell text, row-major
pub type Grid = Vec<Vec<String>>;

/// A worksheet and its cell contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worksheet {
    name: String,
    cells: Grid,
}

impl Worksheet {
    /// Create a worksheet from raw cells
    pub fn new(name: impl Into<String>, cells: Grid) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Worksheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw cells as stored
    pub fn cells(&self) -> &Grid {
        &self.cells
    }

    /// The rectangle of cells holding any text.
    ///
    /// Trailing empty rows and columns are cut and short rows are padded
    /// with empty strings so every row has the same width.
    pub fn used_range(&self) -> Grid {
        let height = self
            .cells
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_empty()))
            .map_or(0, |i| i + 1);

        let width = self.cells[..height]
            .iter()
            .filter_map(|row| row.iter().rposition(|c| !c.is_empty()))
            .max()
            .map_or(0, |i| i + 1);

        self.cells[..height]
            .iter()
            .map(|row| {
                let mut row: Vec<String> = row.iter().take(width).cloned().collect();
                row.resize(width, String::new());
                row
            })
            .collect()
    }
}

/// A table over a worksheet's used range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    worksheet: String,
    texts: Grid,
}

impl Table {
    /// Create a table over the used range of a worksheet
    pub fn from_worksheet(name: impl Into<String>, worksheet: &Worksheet) -> Self {
        Self {
            name: name.into(),
            worksheet: worksheet.name().to_string(),
            texts: worksheet.used_range(),
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the worksheet the table lives on
    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    /// All cell text, header row included
    pub fn texts(&self) -> &Grid {
        &self.texts
    }

    /// Header row
    pub fn header(&self) -> Option<&[String]> {
        self.texts.first().map(Vec::as_slice)
    }

    /// Number of data rows (the header is not counted)
    pub fn row_count(&self) -> usize {
        self.texts.len().saturating_sub(1)
    }
}

/// Tabular host document: read tables, write result sheets
pub trait Workbook {
    /// Look up a worksheet by name
    fn worksheet(&self, name: &str) -> Result<Option<Worksheet>>;

    /// Create an empty worksheet, or return the existing one
    fn add_worksheet(&mut self, name: &str) -> Result<Worksheet>;

    /// Names of the tables defined on a worksheet
    fn tables(&self, worksheet: &str) -> Result<Vec<String>>;

    /// Look up a table by name
    fn table(&self, name: &str) -> Result<Option<Table>>;

    /// Define a table over the used range of `worksheet`
    fn add_table(&mut self, worksheet: &Worksheet, name: &str) -> Result<Table>;

    /// Write `rows` into `worksheet` starting at the top-left cell.
    ///
    /// Cells outside the written block keep their previous text.
    fn write_range(&mut self, worksheet: &str, rows: &[Vec<String>]) -> Result<()>;
}

/// Overwrite the top-left block of `cells` with `rows`, growing as needed
pub(crate) fn overlay(cells: &mut Grid, rows: &[Vec<String>]) {
    if cells.len() < rows.len() {
        cells.resize(rows.len(), Vec::new());
    }
    for (target, source) in cells.iter_mut().zip(rows) {
        if target.len() < source.len() {
            target.resize(source.len(), String::new());
        }
        target[..source.len()].clone_from_slice(source);
    }
}
