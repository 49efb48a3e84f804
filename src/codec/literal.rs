//! SQL literal rendering for representative values.
//!
//! Quoting is deliberately not implemented: a value whose text contains a
//! single quote is rejected instead of escaped.

use super::{registry, LiteralStyle};
use crate::error::{ColIndexError, Result};
use crate::types::{Cell, LogicalType, Value};

/// The literal token for SQL `NULL`.
pub const NULL_LITERAL: &str = "NULL";

/// The plain text form of a value as used inside literals.
pub fn value_text(logical_type: LogicalType, value: &Value) -> Result<String> {
    let codec = registry(logical_type);
    if !codec.accepts(value) {
        return Err(codec.wrong_kind(value));
    }
    Ok(value.to_string())
}

/// Renders `value` as a SQL literal of `logical_type`; `None` renders as `NULL`.
pub fn literal(logical_type: LogicalType, value: Option<&Value>) -> Result<String> {
    let Some(value) = value else {
        return Ok(NULL_LITERAL.to_string());
    };
    let text = value_text(logical_type, value)?;
    if text.contains('\'') {
        return Err(ColIndexError::LiteralQuoting(text));
    }
    let codec = registry(logical_type);
    Ok(match codec.literal_style {
        LiteralStyle::Bare => text,
        LiteralStyle::Cast => format!("CAST('{}' AS {})", text, codec.sql_type),
    })
}

pub fn literal_for_cell(logical_type: LogicalType, cell: &Cell) -> Result<String> {
    literal(logical_type, cell.as_ref())
}
