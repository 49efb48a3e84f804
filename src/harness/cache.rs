//! An explicit, at-most-once cache of materialized tables.
//!
//! One entry per (writer engine, type list). Building an entry generates the
//! dataset, writes its files into a fresh table directory and asks the
//! writer to create the table over it. Callers are sequential; the cache is
//! owned by one run context and torn down at its end.

use hashbrown::HashMap;
use std::sync::Arc;

use crate::collaborators::{ArtifactStore, TableWriter};
use crate::config::HarnessConfig;
use crate::dataset::{generate, transpose, Dataset};
use crate::error::{ColIndexError, Result};
use crate::types::{Engine, LogicalType};
use crate::writer::{write_dataset, WrittenFile};

use super::table::{TableDefinition, TableReference};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub writer: Engine,
    pub types: Vec<LogicalType>,
}

/// A table that has been written and created.
#[derive(Debug, Clone)]
pub struct CachedTable {
    pub table: TableReference,
    pub definition: TableDefinition,
    pub dataset: Dataset,
    pub files: Vec<WrittenFile>,
}

pub struct DatasetCache {
    config: Arc<HarnessConfig>,
    entries: HashMap<DatasetKey, CachedTable>,
    builds: usize,
}

impl DatasetCache {
    pub fn new(config: Arc<HarnessConfig>) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            builds: 0,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tables built over the cache's lifetime.
    pub fn build_count(&self) -> usize {
        self.builds
    }

    pub fn get(&self, writer: Engine, types: &[LogicalType]) -> Option<&CachedTable> {
        self.entries.get(&DatasetKey {
            writer,
            types: types.to_vec(),
        })
    }

    /// Returns the table for `(writer.engine(), types)`, building it on first use.
    pub fn get_or_build(
        &mut self,
        writer: &mut dyn TableWriter,
        store: &dyn ArtifactStore,
        types: &[LogicalType],
    ) -> Result<&CachedTable> {
        let key = DatasetKey {
            writer: writer.engine(),
            types: types.to_vec(),
        };
        if !self.entries.contains_key(&key) {
            let built = self.build(writer, store, types)?;
            self.builds += 1;
            self.entries.insert(key.clone(), built);
        }
        self.entries
            .get(&key)
            .ok_or_else(|| ColIndexError::InternalError("cache entry vanished".to_string()))
    }

    fn build(
        &self,
        writer: &mut dyn TableWriter,
        store: &dyn ArtifactStore,
        types: &[LogicalType],
    ) -> Result<CachedTable> {
        let table = TableReference::generate(&self.config.table_prefix, writer.engine());
        let location = table.location(&self.config.work_root);
        log::info!(
            "Building table {} ({} columns) at {}",
            table,
            types.len(),
            location.display()
        );

        store.create_dir(&location)?;
        match self.populate(writer, table, types) {
            Ok(built) => Ok(built),
            Err(e) => {
                // Nothing was cached, so teardown would never see this directory.
                if let Err(cleanup) = store.remove_dir_all(&location) {
                    log::warn!(
                        "Failed to remove {} after a failed build: {}",
                        location.display(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    fn populate(
        &self,
        writer: &mut dyn TableWriter,
        table: TableReference,
        types: &[LogicalType],
    ) -> Result<CachedTable> {
        let location = table.location(&self.config.work_root);
        let dataset = transpose(&generate(types))?;
        let files = write_dataset(&location, &dataset, &self.config)?;

        let definition = TableDefinition::new(&table.name, types, location);
        writer.create_external_table(&definition)?;
        checkpoint!("event" = "table_created", "table" = &table.name, "writer" = writer.engine());

        Ok(CachedTable {
            table,
            definition,
            dataset,
            files,
        })
    }

    /// Drops every cached table and removes its directory, then empties the cache.
    ///
    /// Each entry is dropped by the writer whose engine created it. With
    /// `keep_artifacts` set, tables and files are left in place and only the
    /// cache is cleared. On error, entries not yet dropped stay cached; an
    /// entry leaves the cache as soon as its table is dropped, so a retry never
    /// drops the same table twice.
    pub fn teardown(
        &mut self,
        writers: &mut [&mut dyn TableWriter],
        store: &dyn ArtifactStore,
    ) -> Result<()> {
        if self.config.keep_artifacts {
            for entry in self.entries.values() {
                log::info!(
                    "Keeping table {} at {}",
                    entry.table,
                    entry.definition.location.display()
                );
            }
            self.entries.clear();
            return Ok(());
        }

        let keys: Vec<DatasetKey> = self.entries.keys().cloned().collect();
        for key in keys {
            let Some(entry) = self.entries.get(&key) else {
                continue;
            };
            let table = entry.table.clone();
            let writer = writers
                .iter_mut()
                .find(|w| w.engine() == key.writer)
                .ok_or_else(|| {
                    ColIndexError::InvalidConfig(format!(
                        "no {} writer available to drop {}",
                        key.writer, entry.table
                    ))
                })?;
            writer.drop_table(&table.name)?;
            log::info!("Dropped table {}", table);
            if let Some(dropped) = self.entries.remove(&key) {
                store.remove_dir_all(&dropped.definition.location)?;
            }
        }
        Ok(())
    }
}
