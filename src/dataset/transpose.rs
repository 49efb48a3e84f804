//! Conversion between the column-oriented and row-oriented dataset shapes.

use crate::error::{ColIndexError, Result};

use super::{ColumnFile, ColumnarDataset, Dataset, Row, RowFile};

/// Transposes every file's column lists into row lists by index-aligned zipping.
///
/// Fails with `TransposeShape` if the columns of any file differ in length.
pub fn transpose(columnar: &ColumnarDataset) -> Result<Dataset> {
    let files = columnar
        .files
        .iter()
        .enumerate()
        .map(|(file_idx, file)| transpose_file(file_idx, file))
        .collect::<Result<Vec<_>>>()?;
    Ok(Dataset {
        types: columnar.types.clone(),
        files,
    })
}

fn transpose_file(file_idx: usize, file: &ColumnFile) -> Result<RowFile> {
    let expected = file.row_count();
    if let Some((column_idx, column)) = file
        .columns
        .iter()
        .enumerate()
        .find(|(_, c)| c.len() != expected)
    {
        return Err(ColIndexError::TransposeShape {
            file_idx,
            column_idx,
            expected,
            actual: column.len(),
        });
    }
    let rows = (0..expected)
        .map(|i| file.columns.iter().map(|col| col[i].clone()).collect::<Row>())
        .collect();
    Ok(RowFile { rows })
}

/// Groups a row-oriented dataset back by column index. Inverse of `transpose`.
///
/// Fails with `TransposeShape` if the rows of any file differ in width; the
/// error's `column_idx` then names the offending row.
pub fn regroup(dataset: &Dataset) -> Result<ColumnarDataset> {
    let files = dataset
        .files
        .iter()
        .enumerate()
        .map(|(file_idx, file)| {
            let width = file.rows.first().map_or(0, Vec::len);
            let mut columns: Vec<Vec<_>> = vec![Vec::with_capacity(file.rows.len()); width];
            for (row_idx, row) in file.rows.iter().enumerate() {
                if row.len() != width {
                    return Err(ColIndexError::TransposeShape {
                        file_idx,
                        column_idx: row_idx,
                        expected: width,
                        actual: row.len(),
                    });
                }
                for (col, cell) in columns.iter_mut().zip(row) {
                    col.push(cell.clone());
                }
            }
            Ok(ColumnFile { columns })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ColumnarDataset {
        types: dataset.types.clone(),
        files,
    })
}
