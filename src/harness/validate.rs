//! Runs one query with pushdown off and on and compares the two results.

use crate::collaborators::SqlReader;
use crate::comparator;
use crate::error::Result;

/// Pushdown off yields the reference rows, pushdown on the actual rows.
///
/// Fails with `Mismatch` if their canonical renderings differ. Reader
/// failures propagate unchanged.
pub fn validate_query_results(reader: &mut dyn SqlReader, query: &str) -> Result<()> {
    reader.set_predicate_pushdown(false)?;
    let reference = reader.query_rows(query)?;

    reader.set_predicate_pushdown(true)?;
    let actual = reader.query_rows(query)?;

    log::debug!(
        "{} -> {} reference rows, {} actual rows",
        query,
        reference.len(),
        actual.len()
    );
    comparator::compare(&reference, &actual)
}
