//! This module defines the core, strongly-typed data representations used
//! throughout the colindex fixture pipeline.
//!
//! It includes the closed `LogicalType` set, the dynamic `Value` carried by
//! dataset cells, and the physical representations those values encode into.

pub mod decimal;
pub mod engine;
pub mod logical_type;
pub mod physical;
pub mod value;

// Re-export the main type(s) for easier access.
pub use decimal::Decimal;
pub use engine::Engine;
pub use logical_type::{supported_types, LogicalType};
pub use physical::{NanoTime, PhysicalKind, PhysicalSchemaFragment, PhysicalValue, TypeAnnotation};
pub use value::{Cell, Value};
