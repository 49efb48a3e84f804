//! Filter operators and the query text template used to probe a reader.
//!
//! Template: `SELECT id, <column> FROM <table> WHERE <column> <op> <literal> ORDER BY id`.
//! For `IS` / `IS NOT` the literal is always `NULL`; every other operator is
//! probed once per representative value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::codec::{self, NULL_LITERAL};
use crate::error::{ColIndexError, Result};
use crate::types::LogicalType;

/// Name of the row identifier column.
pub const ID_COLUMN: &str = "id";

/// A comparison or null-check operator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "IS")]
    IsNull,
    #[serde(rename = "IS NOT")]
    IsNotNull,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Eq,
        Operator::Lt,
        Operator::Gt,
        Operator::Le,
        Operator::Ge,
        Operator::NotEq,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    pub fn sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::NotEq => "!=",
            Operator::IsNull => "IS",
            Operator::IsNotNull => "IS NOT",
        }
    }

    /// `true` for `IS` and `IS NOT`, whose operand is always `NULL`.
    pub fn is_null_check(&self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

impl FromStr for Operator {
    type Err = ColIndexError;

    fn from_str(s: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.sql().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ColIndexError::InvalidConfig(format!("unknown operator '{}'", s)))
    }
}

/// Named operator sets selectable from configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperatorPreset {
    /// **Default:** equality only, for quick runs.
    #[default]
    Default,
    /// Every comparison and null-check operator.
    All,
}

impl OperatorPreset {
    pub fn operators(&self) -> Vec<Operator> {
        match self {
            OperatorPreset::Default => vec![Operator::Eq],
            OperatorPreset::All => Operator::ALL.to_vec(),
        }
    }
}

impl FromStr for OperatorPreset {
    type Err = ColIndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(OperatorPreset::Default),
            "all" => Ok(OperatorPreset::All),
            other => Err(ColIndexError::InvalidConfig(format!(
                "unknown operator preset '{}'",
                other
            ))),
        }
    }
}

/// Renders one filter query from its parts.
pub fn render_query(table: &str, column: &str, op: Operator, literal: &str) -> String {
    format!(
        "SELECT {id}, {col} FROM {table} WHERE {col} {op} {literal} ORDER BY {id}",
        id = ID_COLUMN,
        col = column,
        table = table,
        op = op.sql(),
        literal = literal
    )
}

/// Every query that probes `logical_type` with `op` against `table`.
pub fn build_queries(table: &str, logical_type: LogicalType, op: Operator) -> Result<Vec<String>> {
    let column = logical_type.column_name();
    if op.is_null_check() {
        return Ok(vec![render_query(table, column, op, NULL_LITERAL)]);
    }
    codec::representative_values(logical_type)
        .iter()
        .map(|v| -> Result<String> {
            let literal = codec::literal(logical_type, Some(v))?;
            Ok(render_query(table, column, op, &literal))
        })
        .collect()
}
