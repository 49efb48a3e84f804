// In: src/config.rs

//! The single source of truth for all colindex harness configuration.
//!
//! `HarnessConfig` is created once at the application boundary (from a JSON
//! document, the environment, or `Default`) and then passed down through the
//! system as a shared, read-only `Arc<HarnessConfig>`.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::dataset::STATS_PAGE_ROWS;
use crate::error::{ColIndexError, Result};
use crate::query::OperatorPreset;

/// Environment variable that keeps tables and files after teardown when set to a truthy value.
pub const ENV_KEEP_TABLES: &str = "COLINDEX_KEEP_TABLES";
/// Environment variable overriding `work_root`.
pub const ENV_WORK_ROOT: &str = "COLINDEX_WORK_ROOT";
/// Environment variable overriding `operators` (`default` or `all`).
pub const ENV_OPERATORS: &str = "COLINDEX_OPERATORS";

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// Compression codec applied to every column chunk of the written files.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnCompression {
    /// **Default:** pages are stored as-is, keeping the fixture byte-stable.
    #[default]
    Uncompressed,
    Snappy,
    Gzip,
    Zstd,
}

//==================================================================================
// II. The Unified HarnessConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct HarnessConfig {
    /// Rows per statistics page. The placement table assumes 3; other values
    /// are accepted for experiments but void the fixture's coverage guarantees.
    #[serde(default = "default_page_row_limit")]
    pub page_row_limit: usize,

    #[serde(default)]
    pub compression: ColumnCompression,

    /// If true, tables and their directories survive teardown for inspection.
    #[serde(default)]
    pub keep_artifacts: bool,

    /// Directory receiving one sub-directory per generated table.
    #[serde(default = "default_work_root")]
    pub work_root: PathBuf,

    /// Prefix of generated table names; the writer engine and a random suffix follow.
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,

    /// Which operators each column is probed with.
    #[serde(default)]
    pub operators: OperatorPreset,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            page_row_limit: default_page_row_limit(),
            compression: ColumnCompression::default(),
            keep_artifacts: false,
            work_root: default_work_root(),
            table_prefix: default_table_prefix(),
            operators: OperatorPreset::default(),
        }
    }
}

impl HarnessConfig {
    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: HarnessConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `COLINDEX_*` environment overrides on top of the current values.
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(v) = env::var(ENV_KEEP_TABLES) {
            self.keep_artifacts = parse_flag(&v);
        }
        if let Ok(v) = env::var(ENV_WORK_ROOT) {
            if !v.trim().is_empty() {
                self.work_root = PathBuf::from(v);
            }
        }
        if let Ok(v) = env::var(ENV_OPERATORS) {
            self.operators = v.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_row_limit == 0 {
            return Err(ColIndexError::InvalidConfig(
                "page_row_limit must be at least 1".to_string(),
            ));
        }
        if self.table_prefix.trim().is_empty() {
            return Err(ColIndexError::InvalidConfig(
                "table_prefix must not be empty".to_string(),
            ));
        }
        if self.page_row_limit != STATS_PAGE_ROWS {
            log::warn!(
                "page_row_limit is {}, the fixture layout is designed for {}",
                self.page_row_limit,
                STATS_PAGE_ROWS
            );
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Helper for `serde` to provide a default for `page_row_limit`.
fn default_page_row_limit() -> usize {
    STATS_PAGE_ROWS
}

fn default_work_root() -> PathBuf {
    env::temp_dir().join("colindex")
}

fn default_table_prefix() -> String {
    "ColumnIndexFiltering".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.page_row_limit, 3);
        assert_eq!(config.compression, ColumnCompression::Uncompressed);
        assert!(!config.keep_artifacts);
        assert_eq!(config.operators, OperatorPreset::Default);
        config.validate().unwrap();
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config =
            HarnessConfig::from_json_str(r#"{"compression": "zstd", "operators": "all"}"#).unwrap();
        assert_eq!(config.compression, ColumnCompression::Zstd);
        assert_eq!(config.operators, OperatorPreset::All);
        assert_eq!(config.page_row_limit, 3);
        assert_eq!(config.table_prefix, "ColumnIndexFiltering");
    }

    #[test]
    fn test_zero_page_rows_is_rejected() {
        let err = HarnessConfig::from_json_str(r#"{"page_row_limit": 0}"#).unwrap_err();
        assert!(matches!(err, ColIndexError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json_is_a_serde_error() {
        let err = HarnessConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ColIndexError::SerdeJson(_)));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
