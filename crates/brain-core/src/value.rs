//! Conversions between application values and SQLite primitives.
//!
//! - `bool` is stored as INTEGER 0/1.
//! - Timestamps are stored as RFC 3339 UTC text with full sub-second precision.
//! - Absent values are stored as NULL, never as an empty string or zero.
//! - Structured values are stored as JSON text.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BrainError, Result};

/// Logical type of a registered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Real,
    Boolean,
    Timestamp,
    Json,
}

impl ColumnType {
    /// SQLite storage class used in `CREATE TABLE`.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Text | ColumnType::Timestamp | ColumnType::Json => "TEXT",
            ColumnType::Integer | ColumnType::Boolean => "INTEGER",
            ColumnType::Real => "REAL",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Real => "real",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Json => "json",
        }
    }
}

pub fn encode_bool(value: bool) -> Value {
    Value::Integer(i64::from(value))
}

pub fn decode_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Integer(n) => Ok(*n != 0),
        // Rows written by hand may carry NULL for a flag that was never set.
        Value::Null => Ok(false),
        other => Err(BrainError::Decode(format!(
            "Expected integer flag, found {}",
            value_kind(other)
        ))),
    }
}

pub fn encode_timestamp(value: &DateTime<Utc>) -> Value {
    Value::Text(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

pub fn encode_opt_timestamp(value: Option<&DateTime<Utc>>) -> Value {
    value.map(encode_timestamp).unwrap_or(Value::Null)
}

/// Decode a nullable timestamp column. NULL and empty text both mean "absent".
pub fn decode_opt_timestamp(value: &Value) -> Result<Option<DateTime<Utc>>> {
    match value {
        Value::Null => Ok(None),
        Value::Text(text) if text.trim().is_empty() => Ok(None),
        Value::Text(text) => parse_timestamp(text).map(Some),
        other => Err(BrainError::Decode(format!(
            "Expected timestamp text, found {}",
            value_kind(other)
        ))),
    }
}

pub fn decode_timestamp(value: &Value) -> Result<DateTime<Utc>> {
    decode_opt_timestamp(value)?
        .ok_or_else(|| BrainError::Decode("Required timestamp is missing".to_string()))
}

pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| BrainError::Decode(format!("Invalid timestamp '{}': {}", text, e)))
}

pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(Value::Text(serde_json::to_string(value)?))
}

/// Decode JSON text, falling back to `default` on any failure.
///
/// A NULL or missing value yields `default` silently; malformed JSON is
/// logged before falling back.
pub fn decode_json_or<T: DeserializeOwned>(raw: Option<&str>, default: T, context: &str) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(context, error = %err, "stored JSON could not be decoded, using default");
            default
        }
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Integer(_) => "integer",
        Value::Real(_) => "real",
        Value::Text(_) => "text",
        Value::Blob(_) => "blob",
    }
}
