// In: src/harness/mod.rs

//! The collaborator-facing driver.
//!
//! One filtering case probes one logical type on one reader: the type is
//! skipped if the reader cannot read it, otherwise the shared table is built
//! (or fetched from the cache) and every query for every configured operator
//! is validated with pushdown off versus on.

use crate::collaborators::{ArtifactStore, SqlReader, TableWriter};
use crate::error::Result;
use crate::query::build_queries;
use crate::types::{supported_types, LogicalType};

pub mod cache;
pub mod table;
pub mod validate;

pub use cache::{CachedTable, DatasetCache, DatasetKey};
pub use table::{column_definitions, TableDefinition, TableReference, STORAGE_FORMAT};
pub use validate::validate_query_results;

/// Result of one filtering case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    /// Every query returned identical rows with pushdown off and on.
    Passed { queries: usize },
    /// The reader cannot read the type; nothing was run.
    Skipped { reason: String },
}

/// Probes `logical_type` on `reader`, using a table created by `writer`.
///
/// The table holds every type the reader supports. The first failing query
/// aborts the case with its error.
pub fn run_filtering_case(
    cache: &mut DatasetCache,
    writer: &mut dyn TableWriter,
    reader: &mut dyn SqlReader,
    store: &dyn ArtifactStore,
    logical_type: LogicalType,
) -> Result<CaseOutcome> {
    let engine = reader.engine();
    if !logical_type.is_supported(engine) {
        log::info!("Skipping {} on {}: unsupported", logical_type, engine);
        return Ok(CaseOutcome::Skipped {
            reason: format!("{} is not supported by {}", logical_type, engine),
        });
    }

    let operators = cache.config().operators.operators();
    let types = supported_types(engine);
    let table_name = cache.get_or_build(writer, store, &types)?.table.name.clone();

    let mut queries = 0;
    for op in operators {
        for query in build_queries(&table_name, logical_type, op)? {
            checkpoint!("event" = "validate", "query" = &query);
            validate_query_results(reader, &query)?;
            queries += 1;
        }
    }

    log::info!(
        "{} on {} (table {}): {} queries passed",
        logical_type,
        engine,
        table_name,
        queries
    );
    Ok(CaseOutcome::Passed { queries })
}

/// Runs `run_filtering_case` for every logical type in stable order.
///
/// Stops at the first failing case.
pub fn run_all_cases(
    cache: &mut DatasetCache,
    writer: &mut dyn TableWriter,
    reader: &mut dyn SqlReader,
    store: &dyn ArtifactStore,
) -> Result<Vec<(LogicalType, CaseOutcome)>> {
    LogicalType::ALL
        .iter()
        .map(|&t| -> Result<(LogicalType, CaseOutcome)> {
            Ok((t, run_filtering_case(cache, writer, reader, store, t)?))
        })
        .collect()
}
