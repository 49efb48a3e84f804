//! Table naming and the DDL-facing table description.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::query::ID_COLUMN;
use crate::types::{Engine, LogicalType};

/// Storage format every generated table declares.
pub const STORAGE_FORMAT: &str = "PARQUET";

/// SQL type of the row identifier column.
pub const ID_SQL_TYPE: &str = "INT";

/// A generated table and the engine that created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableReference {
    pub writer: Engine,
    pub name: String,
}

impl TableReference {
    /// `<prefix>_<ENGINE>_<random hex>`, lower-cased.
    pub fn generate(prefix: &str, writer: Engine) -> Self {
        let suffix: u32 = rand::random();
        let name = format!("{}_{}_{:08x}", prefix, writer.name(), suffix).to_lowercase();
        Self { writer, name }
    }

    /// Directory holding this table's files under `work_root`.
    pub fn location(&self, work_root: &Path) -> PathBuf {
        work_root.join(&self.name)
    }
}

impl fmt::Display for TableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Everything a `TableWriter` needs to issue `CREATE EXTERNAL TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    /// Ordered `(column name, SQL type)` pairs, `id INT` first.
    pub columns: Vec<(String, String)>,
    pub location: PathBuf,
    pub format: &'static str,
}

impl TableDefinition {
    pub fn new(name: &str, types: &[LogicalType], location: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            columns: column_definitions(types),
            location,
            format: STORAGE_FORMAT,
        }
    }

    /// The comma-separated `name type` list used inside DDL parentheses.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|(name, sql)| format!("{} {}", name, sql))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn column_definitions(types: &[LogicalType]) -> Vec<(String, String)> {
    std::iter::once((ID_COLUMN.to_string(), ID_SQL_TYPE.to_string()))
        .chain(
            types
                .iter()
                .map(|t| (t.column_name().to_string(), t.sql_type().to_string())),
        )
        .collect()
}
