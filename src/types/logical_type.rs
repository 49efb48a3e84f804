//! This module defines the canonical, closed set of logical column types
//! exercised by the column-index fixture.

use arrow::datatypes::{DataType as ArrowDataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::engine::Engine;
use super::physical::TypeAnnotation;
use crate::codec;

/// Every logical column type the fixture knows how to encode.
///
/// The declaration order is not relied upon; `LogicalType::ALL` is the
/// authoritative, stable column order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalType {
    Boolean,
    Int32,
    Int64,
    Int96Timestamp,
    Float,
    Double,
    Fixed3,
    Binary,
    Utf8,
    DecimalAsInt32,
    DecimalAsInt64,
    DecimalAsFixed8,
    DecimalAsBinary,
}

impl LogicalType {
    /// The stable, total column order of the closed type set.
    pub const ALL: [LogicalType; 13] = [
        LogicalType::Boolean,
        LogicalType::Int32,
        LogicalType::Int64,
        LogicalType::Int96Timestamp,
        LogicalType::Float,
        LogicalType::Double,
        LogicalType::Fixed3,
        LogicalType::Binary,
        LogicalType::Utf8,
        LogicalType::DecimalAsInt32,
        LogicalType::DecimalAsInt64,
        LogicalType::DecimalAsFixed8,
        LogicalType::DecimalAsBinary,
    ];

    /// Position of this type in `LogicalType::ALL`.
    pub fn ordinal(&self) -> usize {
        Self::ALL
            .iter()
            .position(|t| t == self)
            .unwrap_or(Self::ALL.len())
    }

    pub fn column_name(&self) -> &'static str {
        codec::registry(*self).column_name
    }

    pub fn sql_type(&self) -> &'static str {
        codec::registry(*self).sql_type
    }

    pub fn is_supported(&self, engine: Engine) -> bool {
        codec::is_supported(*self, engine)
    }

    pub fn is_decimal(&self) -> bool {
        matches!(
            codec::registry(*self).schema.annotation,
            Some(TypeAnnotation::Decimal { .. })
        )
    }

    /// The Arrow type a parquet-to-arrow reader produces for this column.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::Boolean => ArrowDataType::Boolean,
            Self::Int32 => ArrowDataType::Int32,
            Self::Int64 => ArrowDataType::Int64,
            Self::Int96Timestamp => ArrowDataType::Timestamp(TimeUnit::Nanosecond, None),
            Self::Float => ArrowDataType::Float32,
            Self::Double => ArrowDataType::Float64,
            Self::Fixed3 => ArrowDataType::FixedSizeBinary(3),
            Self::Binary => ArrowDataType::Binary,
            Self::Utf8 => ArrowDataType::Utf8,
            Self::DecimalAsInt32 => ArrowDataType::Decimal128(9, 2),
            Self::DecimalAsInt64 => ArrowDataType::Decimal128(18, 4),
            Self::DecimalAsFixed8 => ArrowDataType::Decimal128(18, 6),
            Self::DecimalAsBinary => ArrowDataType::Decimal128(38, 12),
        }
    }
}

/// Every type supported by `engine`, in stable column order.
pub fn supported_types(engine: Engine) -> Vec<LogicalType> {
    LogicalType::ALL
        .iter()
        .copied()
        .filter(|t| t.is_supported(engine))
        .collect()
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
