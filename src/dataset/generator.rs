//! Deterministic construction of the column-oriented boundary-value dataset.
//!
//! Three files of 7, 9 and 7 rows straddle a statistics page of 3 rows: the
//! 7-row files end in a one-row partial page, the 9-row file holds exactly
//! three full pages. Every logical column uses the same hand-authored
//! placement of its four representative values and nulls. Reader-side index
//! pruning is sensitive to exact page contents, so the placement table is a
//! fixture and must not be re-derived.

use crate::codec;
use crate::types::{Cell, LogicalType, Value};

use super::{ColumnFile, ColumnarDataset};

/// Rows per statistics page the placement table is designed around.
pub const STATS_PAGE_ROWS: usize = 3;

/// Row counts of the three logical files.
pub const FILE_ROW_COUNTS: [usize; 3] = [7, 9, 7];

/// First row identifier; identifiers are contiguous across files.
const FIRST_ROW_ID: i32 = 1;

/// A slot in the placement table: one of the four representative values, or null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// extreme-low
    A,
    /// below zero
    B,
    /// above zero
    C,
    /// extreme-high
    D,
    N,
}

use Slot::{A, B, C, D, N};

#[rustfmt::skip]
const PLACEMENT: [&[Slot]; 3] = [
    &[A, B, C,
      B, C, D,
      N],
    &[N, C, D,
      N, N, N,
      A, C, N],
    &[B, N, D,
      A, N, A,
      B],
];

fn resolve(slot: Slot, values: &[Value; 4]) -> Cell {
    match slot {
        A => Some(values[0].clone()),
        B => Some(values[1].clone()),
        C => Some(values[2].clone()),
        D => Some(values[3].clone()),
        N => None,
    }
}

/// Builds the column-oriented dataset for `types`, in the order given.
///
/// Column 0 of every file holds the row identifiers.
pub fn generate(types: &[LogicalType]) -> ColumnarDataset {
    let mut next_id = FIRST_ROW_ID;
    let mut files: Vec<ColumnFile> = FILE_ROW_COUNTS
        .iter()
        .map(|&rows| {
            let ids: Vec<Cell> = (next_id..next_id + rows as i32)
                .map(|id| Some(Value::Int32(id)))
                .collect();
            next_id += rows as i32;
            ColumnFile { columns: vec![ids] }
        })
        .collect();

    for &logical_type in types {
        let values = codec::representative_values(logical_type);
        for (file, pattern) in files.iter_mut().zip(PLACEMENT.iter()) {
            file.columns
                .push(pattern.iter().map(|&slot| resolve(slot, &values)).collect());
        }
    }

    log::debug!(
        "Generated {} files ({:?} rows) for {} columns",
        files.len(),
        FILE_ROW_COUNTS,
        types.len()
    );

    ColumnarDataset {
        types: types.to_vec(),
        files,
    }
}
