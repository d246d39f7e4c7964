//! Name-checked row encoding and decoding.
//!
//! Records never index columns by position. [`RowBuilder`] collects
//! `(column, value)` pairs and [`RowValues`] reads them back by name, both
//! resolving names and logical types against the table's [`TableDef`].

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BrainError, Result};
use crate::schema::TableDef;
use crate::value::{self, ColumnType};

/// Encoded form of one record: present columns only, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow {
    pub table: &'static TableDef,
    pub columns: Vec<(&'static str, Value)>,
}

impl EncodedRow {
    /// Primary key value of the encoded row.
    pub fn key(&self) -> Option<&str> {
        let pk = self.table.primary_key().name;
        self.columns.iter().find_map(|(name, value)| match value {
            Value::Text(text) if *name == pk => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Collects a record's fields for an insert-or-replace statement.
///
/// Absent optional fields are omitted entirely. The first error is kept and
/// reported by [`RowBuilder::finish`].
pub struct RowBuilder {
    table: &'static TableDef,
    columns: Vec<(&'static str, Value)>,
    error: Option<BrainError>,
}

impl RowBuilder {
    pub fn new(table: &'static TableDef) -> Self {
        Self {
            table,
            columns: Vec::with_capacity(table.columns.len()),
            error: None,
        }
    }

    fn push(mut self, column: &'static str, expected: ColumnType, value: Value) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.table.column(column) {
            Ok((_, def)) if def.ty != expected => {
                self.error = Some(BrainError::Schema(format!(
                    "Column '{}.{}' is {}, record wrote {}",
                    self.table.name,
                    column,
                    def.ty.as_str(),
                    expected.as_str()
                )));
            }
            Ok(_) if self.columns.iter().any(|(name, _)| *name == column) => {
                self.error = Some(BrainError::Schema(format!(
                    "Column '{}.{}' written twice",
                    self.table.name, column
                )));
            }
            Ok(_) => {
                if !matches!(value, Value::Null) {
                    self.columns.push((column, value));
                }
            }
            Err(err) => self.error = Some(err),
        }
        self
    }

    pub fn text(self, column: &'static str, value: &str) -> Self {
        self.push(column, ColumnType::Text, Value::Text(value.to_string()))
    }

    pub fn opt_text(self, column: &'static str, value: Option<&str>) -> Self {
        let value = value.map_or(Value::Null, |v| Value::Text(v.to_string()));
        self.push(column, ColumnType::Text, value)
    }

    pub fn integer(self, column: &'static str, value: i64) -> Self {
        self.push(column, ColumnType::Integer, Value::Integer(value))
    }

    pub fn opt_integer(self, column: &'static str, value: Option<i64>) -> Self {
        self.push(column, ColumnType::Integer, value.map_or(Value::Null, Value::Integer))
    }

    pub fn real(self, column: &'static str, value: f64) -> Self {
        self.push(column, ColumnType::Real, Value::Real(value))
    }

    pub fn bool(self, column: &'static str, value: bool) -> Self {
        self.push(column, ColumnType::Boolean, value::encode_bool(value))
    }

    pub fn timestamp(self, column: &'static str, value: &DateTime<Utc>) -> Self {
        self.push(column, ColumnType::Timestamp, value::encode_timestamp(value))
    }

    pub fn opt_timestamp(self, column: &'static str, value: Option<&DateTime<Utc>>) -> Self {
        self.push(column, ColumnType::Timestamp, value::encode_opt_timestamp(value))
    }

    pub fn opt_json<T: Serialize>(mut self, column: &'static str, value: Option<&T>) -> Self {
        let encoded = match value.map(value::encode_json).transpose() {
            Ok(encoded) => encoded.unwrap_or(Value::Null),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
                return self;
            }
        };
        self.push(column, ColumnType::Json, encoded)
    }

    /// Validate the collected columns and return them in registry order.
    pub fn finish(self) -> Result<EncodedRow> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut columns = self.columns;
        for def in self.table.columns {
            if !def.nullable && !columns.iter().any(|(name, _)| *name == def.name) {
                return Err(BrainError::Schema(format!(
                    "Required column '{}.{}' was not written",
                    self.table.name, def.name
                )));
            }
        }
        let table = self.table;
        columns.sort_by_key(|(name, _)| table.position(name).unwrap_or(usize::MAX));
        let row = EncodedRow { table, columns };
        match row.key() {
            Some(key) if !key.is_empty() => Ok(row),
            _ => Err(BrainError::InvalidInput(format!(
                "Record for '{}' has an empty primary key",
                table.name
            ))),
        }
    }
}

/// One stored row, as read back in registry column order.
#[derive(Debug)]
pub struct RowValues {
    table: &'static TableDef,
    values: Vec<Value>,
}

impl RowValues {
    pub fn new(table: &'static TableDef, values: Vec<Value>) -> Result<Self> {
        if values.len() != table.columns.len() {
            return Err(BrainError::Schema(format!(
                "Row for '{}' has {} values, registry declares {}",
                table.name,
                values.len(),
                table.columns.len()
            )));
        }
        Ok(Self { table, values })
    }

    pub(crate) fn from_sql(table: &'static TableDef, row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let values = (0..table.columns.len())
            .map(|idx| row.get::<_, Value>(idx))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Self { table, values })
    }

    fn get(&self, column: &str, expected: ColumnType) -> Result<&Value> {
        let (idx, def) = self.table.column(column)?;
        if def.ty != expected {
            return Err(BrainError::Schema(format!(
                "Column '{}.{}' is {}, record read {}",
                self.table.name,
                column,
                def.ty.as_str(),
                expected.as_str()
            )));
        }
        Ok(&self.values[idx])
    }

    fn mismatch(&self, column: &str, wanted: &str, found: &Value) -> BrainError {
        BrainError::Decode(format!(
            "Column '{}.{}': expected {}, found {}",
            self.table.name,
            column,
            wanted,
            value::value_kind(found)
        ))
    }

    pub fn opt_text(&self, column: &str) -> Result<Option<String>> {
        match self.get(column, ColumnType::Text)? {
            Value::Null => Ok(None),
            Value::Text(text) => Ok(Some(text.clone())),
            other => Err(self.mismatch(column, "text", other)),
        }
    }

    pub fn text(&self, column: &str) -> Result<String> {
        self.opt_text(column)?.ok_or_else(|| {
            BrainError::Decode(format!(
                "Column '{}.{}' is NULL",
                self.table.name, column
            ))
        })
    }

    pub fn opt_integer(&self, column: &str) -> Result<Option<i64>> {
        match self.get(column, ColumnType::Integer)? {
            Value::Null => Ok(None),
            Value::Integer(n) => Ok(Some(*n)),
            other => Err(self.mismatch(column, "integer", other)),
        }
    }

    pub fn real(&self, column: &str) -> Result<f64> {
        match self.get(column, ColumnType::Real)? {
            Value::Real(n) => Ok(*n),
            Value::Integer(n) => Ok(*n as f64),
            other => Err(self.mismatch(column, "real", other)),
        }
    }

    pub fn bool(&self, column: &str) -> Result<bool> {
        value::decode_bool(self.get(column, ColumnType::Boolean)?)
    }

    pub fn timestamp(&self, column: &str) -> Result<DateTime<Utc>> {
        value::decode_timestamp(self.get(column, ColumnType::Timestamp)?)
    }

    pub fn opt_timestamp(&self, column: &str) -> Result<Option<DateTime<Utc>>> {
        value::decode_opt_timestamp(self.get(column, ColumnType::Timestamp)?)
    }

    /// Decode a JSON column; malformed JSON reads as absent.
    pub fn opt_json<T: DeserializeOwned>(&self, column: &str) -> Result<Option<T>> {
        match self.get(column, ColumnType::Json)? {
            Value::Null => Ok(None),
            Value::Text(text) => {
                let context = format!("{}.{}", self.table.name, column);
                Ok(value::decode_json_or(Some(text.as_str()), None, &context))
            }
            other => Err(self.mismatch(column, "json text", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PROJECTS, TASKS, WIDGETS};

    #[test]
    fn test_builder_omits_absent_fields_and_orders_columns() {
        let row = RowBuilder::new(&PROJECTS)
            .opt_text("color", Some("#fff"))
            .text("name", "Marketing")
            .opt_text("icon", None)
            .text("id", "p1")
            .finish()
            .unwrap();

        let names: Vec<_> = row.columns.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["id", "name", "color"]);
        assert_eq!(row.key(), Some("p1"));
    }

    #[test]
    fn test_builder_rejects_unknown_column() {
        let err = RowBuilder::new(&PROJECTS)
            .text("id", "p1")
            .text("name", "x")
            .text("colour", "#fff")
            .finish()
            .unwrap_err();
        assert!(matches!(err, BrainError::Schema(_)));
    }

    #[test]
    fn test_builder_rejects_type_mismatch() {
        let err = RowBuilder::new(&TASKS)
            .text("id", "t1")
            .text("title", "x")
            .text("is_done", "false")
            .text("priority", "LOW")
            .finish()
            .unwrap_err();
        assert!(matches!(err, BrainError::Schema(_)));
    }

    #[test]
    fn test_builder_rejects_missing_required_column() {
        let err = RowBuilder::new(&PROJECTS).text("id", "p1").finish().unwrap_err();
        assert!(matches!(err, BrainError::Schema(_)));
    }

    #[test]
    fn test_builder_rejects_empty_key() {
        let err = RowBuilder::new(&PROJECTS)
            .text("id", "")
            .text("name", "x")
            .finish()
            .unwrap_err();
        assert!(matches!(err, BrainError::InvalidInput(_)));
    }

    #[test]
    fn test_values_read_by_name_with_type_check() {
        let row = RowValues::new(
            &PROJECTS,
            vec![
                Value::Text("p1".into()),
                Value::Text("Brand".into()),
                Value::Null,
                Value::Text("#8b5cf6".into()),
            ],
        )
        .unwrap();

        assert_eq!(row.text("name").unwrap(), "Brand");
        assert_eq!(row.opt_text("icon").unwrap(), None);
        assert!(matches!(row.bool("name"), Err(BrainError::Schema(_))));
        assert!(matches!(row.text("nope"), Err(BrainError::Schema(_))));
    }

    #[test]
    fn test_values_reject_wrong_width() {
        let err = RowValues::new(&PROJECTS, vec![Value::Text("p1".into())]).unwrap_err();
        assert!(matches!(err, BrainError::Schema(_)));
    }

    #[test]
    fn test_malformed_json_column_reads_as_absent() {
        let row = RowValues::new(
            &WIDGETS,
            vec![
                Value::Text("w1".into()),
                Value::Text("CLOCK".into()),
                Value::Real(0.0),
                Value::Real(0.0),
                Value::Real(200.0),
                Value::Real(100.0),
                Value::Text("{broken".into()),
            ],
        )
        .unwrap();
        let config: Option<serde_json::Value> = row.opt_json("config").unwrap();
        assert!(config.is_none());
    }
}
