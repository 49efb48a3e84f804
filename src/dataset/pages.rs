//! Page-level statistics over logical values.
//!
//! A column is sliced into pages of a fixed row count and each page is
//! summarised the way a columnar writer does it: row count, null count, min
//! and max. `can_skip` tells whether a reader holding only these statistics
//! may skip the page for a given filter, which is what the fixture's
//! placement table is built to exercise.

use std::cmp::Ordering;

use crate::query::Operator;
use crate::types::{Cell, Value};

/// Summary statistics of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageStats {
    pub row_count: usize,
    pub null_count: usize,
    pub min: Option<Value>,
    pub max: Option<Value>,
    /// Number of distinct non-null values.
    pub distinct_count: usize,
}

impl PageStats {
    pub fn from_cells(cells: &[Cell]) -> Self {
        let mut min: Option<&Value> = None;
        let mut max: Option<&Value> = None;
        let mut distinct: Vec<&Value> = Vec::new();
        for value in cells.iter().flatten() {
            if min.map_or(true, |m| value.compare(m) == Some(Ordering::Less)) {
                min = Some(value);
            }
            if max.map_or(true, |m| value.compare(m) == Some(Ordering::Greater)) {
                max = Some(value);
            }
            if !distinct
                .iter()
                .any(|d| d.compare(value) == Some(Ordering::Equal))
            {
                distinct.push(value);
            }
        }
        Self {
            row_count: cells.len(),
            null_count: cells.iter().filter(|c| c.is_none()).count(),
            min: min.cloned(),
            max: max.cloned(),
            distinct_count: distinct.len(),
        }
    }

    pub fn is_all_null(&self) -> bool {
        self.null_count == self.row_count
    }

    /// At least one non-null value, and all non-null values are equal.
    pub fn is_single_valued(&self) -> bool {
        self.distinct_count == 1
    }

    /// Whether a page with these statistics provably holds no row matching
    /// `column <op> literal`. A `None` literal is SQL `NULL`.
    pub fn can_skip(&self, op: Operator, literal: Option<&Value>) -> bool {
        match op {
            Operator::IsNull => self.null_count == 0,
            Operator::IsNotNull => self.is_all_null(),
            _ => {
                let (Some(min), Some(max), Some(v)) = (&self.min, &self.max, literal) else {
                    // All-null page, or comparison against NULL: nothing can match.
                    return true;
                };
                let (Some(v_min), Some(v_max)) = (v.compare(min), v.compare(max)) else {
                    return false;
                };
                match op {
                    Operator::Eq => v_min == Ordering::Less || v_max == Ordering::Greater,
                    Operator::NotEq => v_min == Ordering::Equal && v_max == Ordering::Equal,
                    Operator::Lt => v_min != Ordering::Greater,
                    Operator::Le => v_min == Ordering::Less,
                    Operator::Gt => v_max != Ordering::Less,
                    Operator::Ge => v_max == Ordering::Greater,
                    Operator::IsNull | Operator::IsNotNull => false,
                }
            }
        }
    }
}

/// Slices `column` into pages of `page_rows` rows (the last may be partial)
/// and summarises each.
pub fn page_stats(column: &[Cell], page_rows: usize) -> Vec<PageStats> {
    if page_rows == 0 {
        return Vec::new();
    }
    column.chunks(page_rows).map(PageStats::from_cells).collect()
}
