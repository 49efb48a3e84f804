//! This module defines the multi-file boundary-value dataset and the two shapes
//! it is handled in: column-oriented (as authored) and row-oriented (as written).
//!
//! Data Flow:
//!
//!   1. [generator::generate]   -> `ColumnarDataset` (one value list per column per file)
//!   2. [transpose::transpose]  -> `Dataset` (one cell list per row per file)
//!   3. [writer]                -> one physical file per `RowFile`
//!
//! Cell 0 of every row is the integer row identifier; cells 1..N follow the
//! ordered `types` list one-to-one.

use crate::types::{Cell, LogicalType};

pub mod generator;
pub mod pages;
pub mod transpose;

pub use generator::{generate, FILE_ROW_COUNTS, STATS_PAGE_ROWS};
pub use pages::{page_stats, PageStats};
pub use transpose::{regroup, transpose};

/// A single row: the identifier cell followed by one cell per logical type.
pub type Row = Vec<Cell>;

/// One logical file in column-oriented form. Column 0 holds the identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFile {
    pub columns: Vec<Vec<Cell>>,
}

/// One logical file in row-oriented form.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFile {
    pub rows: Vec<Row>,
}

/// The dataset as authored: per file, per column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnarDataset {
    pub types: Vec<LogicalType>,
    pub files: Vec<ColumnFile>,
}

/// The dataset as written: per file, per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub types: Vec<LogicalType>,
    pub files: Vec<RowFile>,
}

impl ColumnFile {
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

impl RowFile {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Dataset {
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(RowFile::row_count).sum()
    }

    /// Number of cells every row carries, identifier included.
    pub fn column_count(&self) -> usize {
        self.types.len() + 1
    }
}
