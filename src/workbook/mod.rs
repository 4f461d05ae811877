//! Workbook module
//!
//! The tabular host document records are read from and upload logs are
//! written to.
//!
//! # Backends
//!
//! - **CsvWorkbook**: a directory with one `<sheet>.csv` file per worksheet
//! - **MemoryWorkbook**: in-process sheets, for embedding and tests

mod dir;
mod memory;
mod types;

pub use dir::CsvWorkbook;
pub use memory::MemoryWorkbook;
pub use types::{Grid, Table, Workbook, Worksheet};
