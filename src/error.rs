// In: src/error.rs

//! This module defines the single, unified error type for the entire colindex library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

use crate::types::LogicalType;

/// Convenience alias used by every fallible function in the crate.
pub type Result<T> = std::result::Result<T, ColIndexError>;

#[derive(Error, Debug)]
pub enum ColIndexError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// A value of the wrong dynamic kind was handed to a codec.
    #[error("Unsupported value for {logical_type}: {detail}")]
    UnsupportedValue {
        logical_type: LogicalType,
        detail: String,
    },

    /// The textual form of a value would break single-quote literal quoting.
    #[error("Cannot quote value '{0}' as a SQL literal: it contains a single quote")]
    LiteralQuoting(String),

    /// Columns of one file have unequal lengths. Always a fixture authoring bug.
    #[error("Transpose shape error in file {file_idx}: column {column_idx} has {actual} rows, expected {expected}")]
    TransposeShape {
        file_idx: usize,
        column_idx: usize,
        expected: usize,
        actual: usize,
    },

    /// The pushdown-off and pushdown-on renderings of one query differ.
    #[error("Result mismatch between reference and pushdown run\n--- reference ---\n{reference}\n--- actual ---\n{actual}")]
    Mismatch { reference: String, actual: String },

    #[error("Malformed decimal literal: '{0}'")]
    InvalidDecimal(String),

    #[error("Decimal value out of range: {0}")]
    DecimalOutOfRange(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An opaque failure reported by an external SQL engine or storage layer.
    #[error("Collaborator '{component}' failed: {message}")]
    Collaborator { component: String, message: String },

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the parquet writer or reader.
    #[error("Parquet operation failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading configuration.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl ColIndexError {
    /// Builds an `UnsupportedValue` error for the given type.
    pub fn unsupported(logical_type: LogicalType, detail: impl Into<String>) -> Self {
        ColIndexError::UnsupportedValue {
            logical_type,
            detail: detail.into(),
        }
    }

    /// Wraps a collaborator failure without altering its message.
    pub fn collaborator(component: impl Into<String>, message: impl Into<String>) -> Self {
        ColIndexError::Collaborator {
            component: component.into(),
            message: message.into(),
        }
    }
}
