// In: src/collaborators.rs

//! Narrow interfaces to the systems the harness drives but does not own.
//!
//! A SQL engine that reads tables, a SQL engine that creates them, and the
//! storage that holds their files are all external. The harness only ever
//! talks to them through these traits, so tests can substitute in-memory
//! fakes. Failures reported by an implementation should be wrapped with
//! `ColIndexError::collaborator` and are propagated unmodified.

use std::fs;
use std::path::Path;

use crate::dataset::Row;
use crate::error::Result;
use crate::harness::TableDefinition;
use crate::types::Engine;

/// An engine that executes filter queries and can toggle page-index pruning.
pub trait SqlReader {
    fn engine(&self) -> Engine;

    /// Enables or disables predicate pushdown for subsequent queries.
    fn set_predicate_pushdown(&mut self, enabled: bool) -> Result<()>;

    /// Runs `query` and returns its rows in the order the engine produced them.
    fn query_rows(&mut self, query: &str) -> Result<Vec<Row>>;
}

/// An engine that issues table DDL over a directory of files.
pub trait TableWriter {
    fn engine(&self) -> Engine;

    fn create_external_table(&mut self, definition: &TableDefinition) -> Result<()>;

    fn drop_table(&mut self, table_name: &str) -> Result<()>;
}

/// Directory lifecycle for table locations.
pub trait ArtifactStore {
    fn create_dir(&self, path: &Path) -> Result<()>;

    fn remove_dir_all(&self, path: &Path) -> Result<()>;
}

/// An `ArtifactStore` on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalArtifactStore;

impl ArtifactStore for LocalArtifactStore {
    fn create_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    /// Removing a directory that is already gone is not an error.
    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
