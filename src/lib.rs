//! This file is the root of the `colindex` Rust crate.
//!
//! The crate encodes logical column values into their parquet physical form,
//! builds a small multi-file boundary-value dataset whose page statistics
//! exercise every comparison operator, and validates that an external reader
//! returns identical rows with page-index pruning disabled and enabled.
//!
//! Its responsibilities here are strictly limited to declaring the modules
//! and re-exporting the types most callers need.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod codec;
pub mod collaborators;
pub mod comparator;
pub mod config;
pub mod dataset;
pub mod error;
pub mod harness;
pub mod kernels;
pub mod query;
pub mod types;
pub mod writer;

//==================================================================================
// 2. Re-exports
//==================================================================================
pub use collaborators::{ArtifactStore, LocalArtifactStore, SqlReader, TableWriter};
pub use config::{ColumnCompression, HarnessConfig};
pub use error::{ColIndexError, Result};
pub use harness::{run_filtering_case, CaseOutcome, DatasetCache};
pub use query::{Operator, OperatorPreset};
pub use types::{Cell, Decimal, Engine, LogicalType, PhysicalValue, Value};
