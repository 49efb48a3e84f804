//! Logical values as they appear in the generated dataset and in query results.

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

use super::decimal::Decimal;

/// Formatting pattern for timestamp text, `yyyy-MM-dd HH:mm:ss.SSS`.
pub const TIMESTAMP_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A single non-null logical value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Timestamp(NaiveDateTime),
    Float(f32),
    Double(f64),
    Text(String),
    Decimal(Decimal),
}

/// A nullable cell. `None` is SQL `NULL`.
pub type Cell = Option<Value>;

impl Value {
    /// Short name of the dynamic kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Timestamp(_) => "timestamp",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Decimal(_) => "decimal",
        }
    }

    /// Orders two values of the same kind. Mixed kinds are incomparable.
    ///
    /// Text compares by unsigned bytes, matching parquet's binary statistics order.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Int32(a), Value::Int32(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp_value(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "{}", v.format(TIMESTAMP_TEXT_FORMAT)),
            // Shortest round-trip exponent form keeps the extremes readable.
            Value::Float(v) => write!(f, "{:e}", v),
            Value::Double(v) => write!(f, "{:e}", v),
            Value::Text(v) => f.write_str(v),
            Value::Decimal(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_display_forms() {
        let ts = NaiveDate::from_ymd_opt(1955, 11, 5)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        assert_eq!(Value::Timestamp(ts).to_string(), "1955-11-05 06:00:00.000");
        assert_eq!(Value::Float(f32::MAX).to_string(), "3.4028235e38");
        assert_eq!(Value::Double(f64::from_bits(1)).to_string(), "5e-324");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Decimal(Decimal::new(-42, 0)).to_string(), "-42");
    }

    #[test]
    fn test_compare_same_kind_only() {
        assert_eq!(
            Value::Int32(-42).compare(&Value::Int32(42)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from("Bravo").compare(&Value::from("Alfa")),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Int32(1).compare(&Value::Int64(1)), None);
    }
}
