//! Canonical rendering and comparison of ordered result sets.
//!
//! Rendering is row-major: cells are tab-separated, rows newline-separated,
//! nulls spelled `NULL`, everything else in its default text form. Rows are
//! rendered in the order supplied and never re-sorted, so callers must order
//! their queries (`ORDER BY id`). Two result sets are equal exactly when their
//! renderings are equal, which keeps failure output readable as a whole table.

use std::fmt::{self, Display, Write as _};

use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use colored::Colorize;

use crate::codec::NULL_LITERAL;
use crate::error::{ColIndexError, Result};

const CELL_SEPARATOR: &str = "\t";
const ROW_SEPARATOR: &str = "\n";

/// Renders rows of nullable cells canonically.
pub fn render<T: Display>(rows: &[Vec<Option<T>>]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push_str(ROW_SEPARATOR);
        }
        for (j, cell) in row.iter().enumerate() {
            if j > 0 {
                out.push_str(CELL_SEPARATOR);
            }
            match cell {
                Some(v) => {
                    // Writing into a String cannot fail.
                    let _ = write!(out, "{}", v);
                }
                None => out.push_str(NULL_LITERAL),
            }
        }
    }
    out
}

/// Renders Arrow record batches in the same canonical layout as `render`.
pub fn render_record_batches(batches: &[RecordBatch]) -> Result<String> {
    let options = FormatOptions::default().with_null(NULL_LITERAL);
    let mut lines = Vec::new();
    for batch in batches {
        let formatters = batch
            .columns()
            .iter()
            .map(|c| ArrayFormatter::try_new(c.as_ref(), &options))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for row in 0..batch.num_rows() {
            let cells: Vec<String> = formatters
                .iter()
                .map(|f| f.value(row).to_string())
                .collect();
            lines.push(cells.join(CELL_SEPARATOR));
        }
    }
    Ok(lines.join(ROW_SEPARATOR))
}

/// Fails with `Mismatch`, carrying both renderings verbatim, unless the two
/// result sets render identically.
pub fn compare<T: Display, U: Display>(
    reference_rows: &[Vec<Option<T>>],
    actual_rows: &[Vec<Option<U>>],
) -> Result<()> {
    compare_rendered(render(reference_rows), render(actual_rows))
}

/// `compare` for results that were rendered already.
pub fn compare_rendered(reference: String, actual: String) -> Result<()> {
    if reference == actual {
        Ok(())
    } else {
        Err(ColIndexError::Mismatch { reference, actual })
    }
}

/// A line-by-line view of two renderings for terminal output.
pub struct MismatchReport<'a> {
    pub reference: &'a str,
    pub actual: &'a str,
}

impl<'a> MismatchReport<'a> {
    /// Builds a report from a `Mismatch` error; `None` for any other error.
    pub fn from_error(err: &'a ColIndexError) -> Option<Self> {
        match err {
            ColIndexError::Mismatch { reference, actual } => Some(Self { reference, actual }),
            _ => None,
        }
    }

    /// Indices (0-based) of lines that differ, including lines present on one side only.
    pub fn differing_lines(&self) -> Vec<usize> {
        let reference: Vec<&str> = self.reference.split(ROW_SEPARATOR).collect();
        let actual: Vec<&str> = self.actual.split(ROW_SEPARATOR).collect();
        (0..reference.len().max(actual.len()))
            .filter(|&i| reference.get(i) != actual.get(i))
            .collect()
    }
}

impl fmt::Display for MismatchReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reference: Vec<&str> = self.reference.split(ROW_SEPARATOR).collect();
        let actual: Vec<&str> = self.actual.split(ROW_SEPARATOR).collect();
        for i in 0..reference.len().max(actual.len()) {
            match (reference.get(i), actual.get(i)) {
                (Some(r), Some(a)) if r == a => writeln!(f, "  {}", r)?,
                (r, a) => {
                    if let Some(r) = r {
                        writeln!(f, "{}", format!("- {}", r).red())?;
                    }
                    if let Some(a) = a {
                        writeln!(f, "{}", format!("+ {}", a).green())?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    #[test]
    fn test_null_renders_as_token() {
        let rows = vec![vec![Some(Value::Int32(1)), None]];
        assert_eq!(render(&rows), "1\tNULL");
    }

    #[test]
    fn test_render_is_row_major_and_order_preserving() {
        let rows = vec![
            vec![Some(Value::Int32(3)), Some(Value::from("Delta"))],
            vec![Some(Value::Int32(1)), Some(Value::from("Alfa"))],
        ];
        assert_eq!(render(&rows), "3\tDelta\n1\tAlfa");
        assert_eq!(render::<Value>(&[]), "");
    }

    #[test]
    fn test_compare_accepts_equal_renderings_across_types() {
        let reference = vec![vec![Some(1i64), None]];
        let actual = vec![vec![Some("1".to_string()), None]];
        compare(&reference, &actual).unwrap();
    }

    #[test]
    fn test_compare_reports_both_renderings() {
        let reference = vec![vec![Some(1), Some(42)], vec![Some(2), None]];
        let actual = vec![vec![Some(1), Some(42)]];
        let err = compare(&reference, &actual).unwrap_err();
        match &err {
            ColIndexError::Mismatch { reference, actual } => {
                assert_eq!(reference, "1\t42\n2\tNULL");
                assert_eq!(actual, "1\t42");
            }
            other => panic!("expected Mismatch, got {:?}", other),
        }
        let report = MismatchReport::from_error(&err).unwrap();
        assert_eq!(report.differing_lines(), vec![1]);
        colored::control::set_override(false);
        assert_eq!(report.to_string(), "  1\t42\n- 2\tNULL\n");
    }

    #[test]
    fn test_column_count_difference_is_a_mismatch() {
        let reference = vec![vec![Some(1), Some(2)]];
        let actual = vec![vec![Some(1)]];
        assert!(compare(&reference, &actual).is_err());
    }

    #[test]
    fn test_record_batches_render_like_rows() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, true),
            Field::new("utf8_col", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(vec![Some(1), Some(2)])),
                Arc::new(StringArray::from(vec![None, Some("Bravo")])),
            ],
        )
        .unwrap();
        let rendered = render_record_batches(&[batch]).unwrap();
        assert_eq!(rendered, "1\tNULL\n2\tBravo");

        let rows = vec![
            vec![Some(Value::Int32(1)), None],
            vec![Some(Value::Int32(2)), Some(Value::from("Bravo"))],
        ];
        compare_rendered(render(&rows), rendered).unwrap();
    }
}
