// In: src/codec/mod.rs

//! The type codec registry.
//!
//! Every `LogicalType` owns exactly one static `TypeCodec`: a function table
//! holding its column name, SQL type, physical schema fragment, supportability
//! rule, encoder, decoder and four representative values. `registry()` is the
//! single dispatch point from tag to table; everything else in this module is a
//! thin facade over it.

use chrono::{NaiveDate, NaiveDateTime};
use num_traits::ToPrimitive;

use crate::error::{ColIndexError, Result};
use crate::kernels::{nanotime, twos_complement};
use crate::types::{
    Cell, Decimal, Engine, LogicalType, PhysicalKind, PhysicalSchemaFragment, PhysicalValue,
    TypeAnnotation, Value,
};

mod literal;

pub use literal::{literal, literal_for_cell, value_text, NULL_LITERAL};


//==================================================================================
// 1. The Function Table
//==================================================================================

/// Which engines can read a column of a given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Everywhere,
    OnlyOn(Engine),
    NotOn(Engine),
}

impl Support {
    pub fn allows(&self, engine: Engine) -> bool {
        match self {
            Support::Everywhere => true,
            Support::OnlyOn(only) => *only == engine,
            Support::NotOn(excluded) => *excluded != engine,
        }
    }
}

/// How non-null literals of a type are spelled in query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralStyle {
    /// `CAST('<text>' AS <sql type>)`
    Cast,
    /// The bare value text. String-to-boolean casts disagree between engines.
    Bare,
}

/// The per-type function table.
pub struct TypeCodec {
    pub logical_type: LogicalType,
    pub column_name: &'static str,
    pub sql_type: &'static str,
    pub schema: PhysicalSchemaFragment,
    pub support: Support,
    pub literal_style: LiteralStyle,
    encode: fn(&TypeCodec, &Value) -> Result<PhysicalValue>,
    decode: fn(&TypeCodec, &PhysicalValue) -> Result<Value>,
    values: fn() -> [Value; 4],
}

impl TypeCodec {
    /// Returns `true` if `value` has the dynamic kind this type stores.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self.logical_type, value),
            (LogicalType::Boolean, Value::Boolean(_))
                | (LogicalType::Int32, Value::Int32(_))
                | (LogicalType::Int64, Value::Int64(_))
                | (LogicalType::Int96Timestamp, Value::Timestamp(_))
                | (LogicalType::Float, Value::Float(_))
                | (LogicalType::Double, Value::Double(_))
                | (LogicalType::Fixed3, Value::Text(_))
                | (LogicalType::Binary, Value::Text(_))
                | (LogicalType::Utf8, Value::Text(_))
                | (LogicalType::DecimalAsInt32, Value::Decimal(_))
                | (LogicalType::DecimalAsInt64, Value::Decimal(_))
                | (LogicalType::DecimalAsFixed8, Value::Decimal(_))
                | (LogicalType::DecimalAsBinary, Value::Decimal(_))
        )
    }

    fn wrong_kind(&self, value: &Value) -> ColIndexError {
        ColIndexError::unsupported(
            self.logical_type,
            format!("cannot store a {} value", value.kind_name()),
        )
    }

    fn wrong_physical(&self, value: &PhysicalValue) -> ColIndexError {
        ColIndexError::unsupported(
            self.logical_type,
            format!(
                "cannot decode a {} value, expected {}",
                value.kind(),
                self.schema.kind
            ),
        )
    }
}

//==================================================================================
// 2. Registry
//==================================================================================

const fn decimal(precision: u32, scale: u32) -> TypeAnnotation {
    TypeAnnotation::Decimal { precision, scale }
}

static BOOLEAN: TypeCodec = TypeCodec {
    logical_type: LogicalType::Boolean,
    column_name: "boolean_col",
    sql_type: "BOOLEAN",
    schema: PhysicalSchemaFragment::plain("boolean_col", PhysicalKind::Boolean),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Bare,
    encode: encode_primitive,
    decode: decode_primitive,
    values: || {
        [
            Value::Boolean(false),
            Value::Boolean(false),
            Value::Boolean(true),
            Value::Boolean(true),
        ]
    },
};

static INT32: TypeCodec = TypeCodec {
    logical_type: LogicalType::Int32,
    column_name: "int32_col",
    sql_type: "INT",
    schema: PhysicalSchemaFragment::plain("int32_col", PhysicalKind::Int32),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Cast,
    encode: encode_primitive,
    decode: decode_primitive,
    values: || {
        [
            Value::Int32(i32::MIN),
            Value::Int32(-42),
            Value::Int32(42),
            Value::Int32(i32::MAX),
        ]
    },
};

static INT64: TypeCodec = TypeCodec {
    logical_type: LogicalType::Int64,
    column_name: "int64_col",
    sql_type: "BIGINT",
    schema: PhysicalSchemaFragment::plain("int64_col", PhysicalKind::Int64),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Cast,
    encode: encode_primitive,
    decode: decode_primitive,
    // Hive cannot handle the two most extreme 64-bit values.
    values: || {
        [
            Value::Int64(i64::MIN + 1),
            Value::Int64(-42),
            Value::Int64(42),
            Value::Int64(i64::MAX - 1),
        ]
    },
};

static INT96_TIMESTAMP: TypeCodec = TypeCodec {
    logical_type: LogicalType::Int96Timestamp,
    column_name: "int96_timestamp_col",
    sql_type: "TIMESTAMP",
    schema: PhysicalSchemaFragment::plain("int96_timestamp_col", PhysicalKind::Int96),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Cast,
    encode: encode_timestamp,
    decode: decode_timestamp,
    values: || {
        [
            Value::Timestamp(fixture_timestamp(1885, 1, 1, 0, 0)),
            Value::Timestamp(fixture_timestamp(1955, 11, 5, 6, 0)),
            Value::Timestamp(fixture_timestamp(1985, 10, 26, 1, 22)),
            Value::Timestamp(fixture_timestamp(2015, 10, 21, 16, 29)),
        ]
    },
};

static FLOAT: TypeCodec = TypeCodec {
    logical_type: LogicalType::Float,
    column_name: "float_col",
    sql_type: "FLOAT",
    schema: PhysicalSchemaFragment::plain("float_col", PhysicalKind::Float),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Cast,
    encode: encode_primitive,
    decode: decode_primitive,
    // The inner pair is the smallest positive subnormal and its negation.
    values: || {
        [
            Value::Float(-f32::MAX),
            Value::Float(-f32::from_bits(1)),
            Value::Float(f32::from_bits(1)),
            Value::Float(f32::MAX),
        ]
    },
};

static DOUBLE: TypeCodec = TypeCodec {
    logical_type: LogicalType::Double,
    column_name: "double_col",
    sql_type: "DOUBLE",
    schema: PhysicalSchemaFragment::plain("double_col", PhysicalKind::Double),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Cast,
    encode: encode_primitive,
    decode: decode_primitive,
    values: || {
        [
            Value::Double(-f64::MAX),
            Value::Double(-f64::from_bits(1)),
            Value::Double(f64::from_bits(1)),
            Value::Double(f64::MAX),
        ]
    },
};

static FIXED3: TypeCodec = TypeCodec {
    logical_type: LogicalType::Fixed3,
    column_name: "fixed3_col",
    sql_type: "STRING",
    schema: PhysicalSchemaFragment::plain("fixed3_col", PhysicalKind::FixedLenByteArray)
        .with_length(3),
    support: Support::OnlyOn(Engine::Hive),
    literal_style: LiteralStyle::Cast,
    encode: encode_text,
    decode: decode_text,
    values: || {
        [
            Value::from("BMP"),
            Value::from("GIF"),
            Value::from("JPG"),
            Value::from("PNG"),
        ]
    },
};

static BINARY: TypeCodec = TypeCodec {
    logical_type: LogicalType::Binary,
    column_name: "binary_col",
    sql_type: "STRING",
    schema: PhysicalSchemaFragment::plain("binary_col", PhysicalKind::ByteArray),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Cast,
    encode: encode_text,
    decode: decode_text,
    values: phonetic_values,
};

static UTF8: TypeCodec = TypeCodec {
    logical_type: LogicalType::Utf8,
    column_name: "utf8_col",
    sql_type: "STRING",
    schema: PhysicalSchemaFragment::plain("utf8_col", PhysicalKind::ByteArray)
        .with_annotation(TypeAnnotation::Utf8),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Cast,
    encode: encode_text,
    decode: decode_text,
    values: phonetic_values,
};

static DECIMAL_AS_INT32: TypeCodec = TypeCodec {
    logical_type: LogicalType::DecimalAsInt32,
    column_name: "decimal_as_int32_col",
    sql_type: "DECIMAL(9,2)",
    schema: PhysicalSchemaFragment::plain("decimal_as_int32_col", PhysicalKind::Int32)
        .with_annotation(decimal(9, 2)),
    support: Support::NotOn(Engine::Hive),
    literal_style: LiteralStyle::Cast,
    encode: encode_decimal,
    decode: decode_decimal,
    values: || decimal_values(-123_456_789, 2),
};

static DECIMAL_AS_INT64: TypeCodec = TypeCodec {
    logical_type: LogicalType::DecimalAsInt64,
    column_name: "decimal_as_int64_col",
    sql_type: "DECIMAL(18,4)",
    schema: PhysicalSchemaFragment::plain("decimal_as_int64_col", PhysicalKind::Int64)
        .with_annotation(decimal(18, 4)),
    support: Support::NotOn(Engine::Hive),
    literal_style: LiteralStyle::Cast,
    encode: encode_decimal,
    decode: decode_decimal,
    values: || decimal_values(-123_456_789_123_456_789, 4),
};

static DECIMAL_AS_FIXED8: TypeCodec = TypeCodec {
    logical_type: LogicalType::DecimalAsFixed8,
    column_name: "decimal_as_fixed8_col",
    sql_type: "DECIMAL(18,6)",
    schema: PhysicalSchemaFragment::plain(
        "decimal_as_fixed8_col",
        PhysicalKind::FixedLenByteArray,
    )
    .with_length(8)
    .with_annotation(decimal(18, 6)),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Cast,
    encode: encode_decimal,
    decode: decode_decimal,
    values: || decimal_values(-123_456_789_123_456_789, 6),
};

static DECIMAL_AS_BINARY: TypeCodec = TypeCodec {
    logical_type: LogicalType::DecimalAsBinary,
    column_name: "decimal_as_binary_col",
    sql_type: "DECIMAL(38,12)",
    schema: PhysicalSchemaFragment::plain("decimal_as_binary_col", PhysicalKind::ByteArray)
        .with_annotation(decimal(38, 12)),
    support: Support::Everywhere,
    literal_style: LiteralStyle::Cast,
    encode: encode_decimal,
    decode: decode_decimal,
    values: || decimal_values(-12_345_678_901_234_567_890_123_456_789_012_345_678, 12),
};

/// Selects the function table of `logical_type`.
pub fn registry(logical_type: LogicalType) -> &'static TypeCodec {
    match logical_type {
        LogicalType::Boolean => &BOOLEAN,
        LogicalType::Int32 => &INT32,
        LogicalType::Int64 => &INT64,
        LogicalType::Int96Timestamp => &INT96_TIMESTAMP,
        LogicalType::Float => &FLOAT,
        LogicalType::Double => &DOUBLE,
        LogicalType::Fixed3 => &FIXED3,
        LogicalType::Binary => &BINARY,
        LogicalType::Utf8 => &UTF8,
        LogicalType::DecimalAsInt32 => &DECIMAL_AS_INT32,
        LogicalType::DecimalAsInt64 => &DECIMAL_AS_INT64,
        LogicalType::DecimalAsFixed8 => &DECIMAL_AS_FIXED8,
        LogicalType::DecimalAsBinary => &DECIMAL_AS_BINARY,
    }
}

//==================================================================================
// 3. Public Facade
//==================================================================================

pub fn schema_of(logical_type: LogicalType) -> PhysicalSchemaFragment {
    registry(logical_type).schema
}

pub fn is_supported(logical_type: LogicalType, engine: Engine) -> bool {
    registry(logical_type).support.allows(engine)
}

/// Extreme-low, below-zero, above-zero and extreme-high values, in that order.
pub fn representative_values(logical_type: LogicalType) -> [Value; 4] {
    (registry(logical_type).values)()
}

/// Encodes a non-null logical value into its physical representation.
pub fn encode(logical_type: LogicalType, value: &Value) -> Result<PhysicalValue> {
    let codec = registry(logical_type);
    if !codec.accepts(value) {
        return Err(codec.wrong_kind(value));
    }
    (codec.encode)(codec, value)
}

/// Encodes a nullable cell. Nulls have no physical value.
pub fn encode_cell(logical_type: LogicalType, cell: &Cell) -> Result<Option<PhysicalValue>> {
    cell.as_ref().map(|v| encode(logical_type, v)).transpose()
}

/// Reverses `encode`. Decimals come back at the column's declared scale.
pub fn decode(logical_type: LogicalType, value: &PhysicalValue) -> Result<Value> {
    let codec = registry(logical_type);
    if value.kind() != codec.schema.kind {
        return Err(codec.wrong_physical(value));
    }
    (codec.decode)(codec, value)
}

//==================================================================================
// 4. Encoders & Decoders
//==================================================================================

fn encode_primitive(codec: &TypeCodec, value: &Value) -> Result<PhysicalValue> {
    match value {
        Value::Boolean(v) => Ok(PhysicalValue::Boolean(*v)),
        Value::Int32(v) => Ok(PhysicalValue::Int32(*v)),
        Value::Int64(v) => Ok(PhysicalValue::Int64(*v)),
        Value::Float(v) => Ok(PhysicalValue::Float(*v)),
        Value::Double(v) => Ok(PhysicalValue::Double(*v)),
        other => Err(codec.wrong_kind(other)),
    }
}

fn decode_primitive(codec: &TypeCodec, value: &PhysicalValue) -> Result<Value> {
    match value {
        PhysicalValue::Boolean(v) => Ok(Value::Boolean(*v)),
        PhysicalValue::Int32(v) => Ok(Value::Int32(*v)),
        PhysicalValue::Int64(v) => Ok(Value::Int64(*v)),
        PhysicalValue::Float(v) => Ok(Value::Float(*v)),
        PhysicalValue::Double(v) => Ok(Value::Double(*v)),
        other => Err(codec.wrong_physical(other)),
    }
}

fn encode_timestamp(codec: &TypeCodec, value: &Value) -> Result<PhysicalValue> {
    match value {
        Value::Timestamp(ts) => Ok(PhysicalValue::Int96(nanotime::encode(ts))),
        other => Err(codec.wrong_kind(other)),
    }
}

fn decode_timestamp(codec: &TypeCodec, value: &PhysicalValue) -> Result<Value> {
    match value {
        PhysicalValue::Int96(t) => Ok(Value::Timestamp(nanotime::decode(t)?)),
        other => Err(codec.wrong_physical(other)),
    }
}

fn encode_text(codec: &TypeCodec, value: &Value) -> Result<PhysicalValue> {
    let Value::Text(text) = value else {
        return Err(codec.wrong_kind(value));
    };
    let bytes = text.as_bytes().to_vec();
    match (codec.schema.kind, codec.schema.length) {
        (PhysicalKind::FixedLenByteArray, Some(len)) if bytes.len() == len => {
            Ok(PhysicalValue::FixedLenByteArray(bytes))
        }
        (PhysicalKind::FixedLenByteArray, len) => Err(ColIndexError::unsupported(
            codec.logical_type,
            format!("'{}' is {} bytes, column holds {:?}", text, bytes.len(), len),
        )),
        _ => Ok(PhysicalValue::ByteArray(bytes)),
    }
}

fn decode_text(codec: &TypeCodec, value: &PhysicalValue) -> Result<Value> {
    let bytes = match value {
        PhysicalValue::FixedLenByteArray(b) | PhysicalValue::ByteArray(b) => b,
        other => return Err(codec.wrong_physical(other)),
    };
    String::from_utf8(bytes.clone())
        .map(Value::Text)
        .map_err(|e| ColIndexError::unsupported(codec.logical_type, e.to_string()))
}

fn encode_decimal(codec: &TypeCodec, value: &Value) -> Result<PhysicalValue> {
    let Value::Decimal(d) = value else {
        return Err(codec.wrong_kind(value));
    };
    let (precision, scale) = codec.schema.decimal_params().ok_or_else(|| {
        ColIndexError::InternalError(format!("{} has no decimal annotation", codec.logical_type))
    })?;
    let rescaled = d.rescale(scale)?;
    if rescaled.precision() > precision {
        return Err(ColIndexError::DecimalOutOfRange(format!(
            "{} has {} digits, {} allows {}",
            d,
            rescaled.precision(),
            codec.sql_type,
            precision
        )));
    }
    let unscaled = rescaled.unscaled();
    let narrow_err =
        || ColIndexError::DecimalOutOfRange(format!("{} does not fit {}", d, codec.schema.kind));
    match codec.schema.kind {
        PhysicalKind::Int32 => Ok(PhysicalValue::Int32(unscaled.to_i32().ok_or_else(narrow_err)?)),
        PhysicalKind::Int64 => Ok(PhysicalValue::Int64(unscaled.to_i64().ok_or_else(narrow_err)?)),
        PhysicalKind::FixedLenByteArray => {
            let width = codec.schema.length.ok_or_else(|| {
                ColIndexError::InternalError(format!("{} has no fixed length", codec.logical_type))
            })?;
            Ok(PhysicalValue::FixedLenByteArray(
                twos_complement::to_fixed_bytes(unscaled, width)?,
            ))
        }
        PhysicalKind::ByteArray => Ok(PhysicalValue::ByteArray(
            twos_complement::to_minimal_bytes(unscaled),
        )),
        other => Err(ColIndexError::InternalError(format!(
            "decimal cannot be backed by {}",
            other
        ))),
    }
}

fn decode_decimal(codec: &TypeCodec, value: &PhysicalValue) -> Result<Value> {
    let (_, scale) = codec.schema.decimal_params().ok_or_else(|| {
        ColIndexError::InternalError(format!("{} has no decimal annotation", codec.logical_type))
    })?;
    let unscaled = match value {
        PhysicalValue::Int32(v) => i128::from(*v),
        PhysicalValue::Int64(v) => i128::from(*v),
        PhysicalValue::FixedLenByteArray(b) | PhysicalValue::ByteArray(b) => {
            twos_complement::from_bytes(b)?
        }
        other => return Err(codec.wrong_physical(other)),
    };
    Ok(Value::Decimal(Decimal::new(unscaled, scale)))
}

//==================================================================================
// 5. Representative Value Helpers
//==================================================================================

fn phonetic_values() -> [Value; 4] {
    [
        Value::from("Alfa"),
        Value::from("Bravo"),
        Value::from("Charlie"),
        Value::from("Delta"),
    ]
}

/// `±extreme` at `scale`, plus `±42` written without a fractional part.
fn decimal_values(negative_extreme: i128, scale: u32) -> [Value; 4] {
    [
        Value::Decimal(Decimal::new(negative_extreme, scale)),
        Value::Decimal(Decimal::new(-42, 0)),
        Value::Decimal(Decimal::new(42, 0)),
        Value::Decimal(Decimal::new(-negative_extreme, scale)),
    ]
}

fn fixture_timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    // The fixture dates are compile-time constants that are all valid, so this
    // can only fail if the table above is edited incorrectly.
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("fixture timestamp must be a valid calendar date")
}
