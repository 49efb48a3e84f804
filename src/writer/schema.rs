//! Translation of registry schema fragments into a parquet message type.

use std::sync::Arc;

use parquet::basic::{LogicalType as ParquetLogicalType, Repetition, Type as ParquetPhysicalType};
use parquet::schema::types::{Type, TypePtr};

use crate::codec;
use crate::error::{ColIndexError, Result};
use crate::query::ID_COLUMN;
use crate::types::{LogicalType, PhysicalKind, PhysicalSchemaFragment, TypeAnnotation};

/// Name of the root group of every written file.
pub const MESSAGE_NAME: &str = "record";

/// Fragment of the row identifier column, which is not a registry type.
pub const ID_FRAGMENT: PhysicalSchemaFragment =
    PhysicalSchemaFragment::plain(ID_COLUMN, PhysicalKind::Int32);

fn physical_type(kind: PhysicalKind) -> ParquetPhysicalType {
    match kind {
        PhysicalKind::Boolean => ParquetPhysicalType::BOOLEAN,
        PhysicalKind::Int32 => ParquetPhysicalType::INT32,
        PhysicalKind::Int64 => ParquetPhysicalType::INT64,
        PhysicalKind::Int96 => ParquetPhysicalType::INT96,
        PhysicalKind::Float => ParquetPhysicalType::FLOAT,
        PhysicalKind::Double => ParquetPhysicalType::DOUBLE,
        PhysicalKind::FixedLenByteArray => ParquetPhysicalType::FIXED_LEN_BYTE_ARRAY,
        PhysicalKind::ByteArray => ParquetPhysicalType::BYTE_ARRAY,
    }
}

/// Builds one optional leaf column from its fragment.
pub fn leaf_type(fragment: &PhysicalSchemaFragment) -> Result<TypePtr> {
    let mut builder = Type::primitive_type_builder(fragment.name, physical_type(fragment.kind))
        .with_repetition(Repetition::OPTIONAL);

    if let Some(length) = fragment.length {
        let length = i32::try_from(length).map_err(|_| {
            ColIndexError::InternalError(format!("{} has length {}", fragment.name, length))
        })?;
        builder = builder.with_length(length);
    }

    match fragment.annotation {
        Some(TypeAnnotation::Utf8) => {
            builder = builder.with_logical_type(Some(ParquetLogicalType::String));
        }
        Some(TypeAnnotation::Decimal { precision, scale }) => {
            // Both fit comfortably: precision is at most 38.
            let (precision, scale) = (precision as i32, scale as i32);
            builder = builder
                .with_logical_type(Some(ParquetLogicalType::Decimal { scale, precision }))
                .with_precision(precision)
                .with_scale(scale);
        }
        None => {}
    }

    Ok(Arc::new(builder.build()?))
}

/// The message type for a file holding `id` followed by `types`, in order.
pub fn message_type(types: &[LogicalType]) -> Result<TypePtr> {
    let mut fields = Vec::with_capacity(types.len() + 1);
    fields.push(leaf_type(&ID_FRAGMENT)?);
    for &logical_type in types {
        fields.push(leaf_type(&codec::schema_of(logical_type))?);
    }
    let message = Type::group_type_builder(MESSAGE_NAME)
        .with_fields(fields)
        .build()?;
    Ok(Arc::new(message))
}
