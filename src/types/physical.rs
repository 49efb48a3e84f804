//! Physical (on-disk) storage kinds, schema fragments and encoded values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The primitive storage kind of a parquet column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalKind {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    FixedLenByteArray,
    ByteArray,
}

/// A logical annotation layered on top of a physical kind.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeAnnotation {
    Utf8,
    Decimal { precision: u32, scale: u32 },
}

/// The schema of a single optional leaf column, independent of any writer library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicalSchemaFragment {
    pub name: &'static str,
    pub kind: PhysicalKind,
    /// Byte length, set only for `FixedLenByteArray`.
    pub length: Option<usize>,
    pub annotation: Option<TypeAnnotation>,
}

impl PhysicalSchemaFragment {
    pub const fn plain(name: &'static str, kind: PhysicalKind) -> Self {
        Self {
            name,
            kind,
            length: None,
            annotation: None,
        }
    }

    pub const fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub const fn with_annotation(mut self, annotation: TypeAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Returns `(precision, scale)` for decimal-annotated columns.
    pub fn decimal_params(&self) -> Option<(u32, u32)> {
        match self.annotation {
            Some(TypeAnnotation::Decimal { precision, scale }) => Some((precision, scale)),
            _ => None,
        }
    }
}

/// The decomposition of a timestamp used by 12-byte INT96 values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NanoTime {
    pub julian_day: i32,
    pub nanos_of_day: i64,
}

/// A value in its physical representation, tagged with its storage kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicalValue {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Int96(NanoTime),
    Float(f32),
    Double(f64),
    FixedLenByteArray(Vec<u8>),
    ByteArray(Vec<u8>),
}

impl PhysicalValue {
    pub fn kind(&self) -> PhysicalKind {
        match self {
            Self::Boolean(_) => PhysicalKind::Boolean,
            Self::Int32(_) => PhysicalKind::Int32,
            Self::Int64(_) => PhysicalKind::Int64,
            Self::Int96(_) => PhysicalKind::Int96,
            Self::Float(_) => PhysicalKind::Float,
            Self::Double(_) => PhysicalKind::Double,
            Self::FixedLenByteArray(_) => PhysicalKind::FixedLenByteArray,
            Self::ByteArray(_) => PhysicalKind::ByteArray,
        }
    }
}

impl fmt::Display for PhysicalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
