//! In-memory SQLite engine handle.
//!
//! The database lives entirely in memory. Durability comes from
//! serializing the whole image with [`Database::image`] and reopening it
//! with [`Database::from_image`].

use std::ptr::NonNull;

use rusqlite::serialize::OwnedData;
use rusqlite::{params_from_iter, Connection, DatabaseName, OptionalExtension};

use crate::error::{BrainError, Result};
use crate::model::Record;
use crate::schema::{self, TableDef, ALL_TABLES};
use crate::storage::row::{EncodedRow, RowValues};

/// Owner of the single in-process SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a fresh, empty engine.
    pub fn create() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Reopen an engine from a serialized image.
    pub fn from_image(bytes: &[u8]) -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        let owned_data = owned_data_from_bytes(bytes)?;
        conn.deserialize(DatabaseName::Main, owned_data, false)?;
        Ok(Self { conn })
    }

    /// Serialize the full engine state.
    pub fn image(&self) -> Result<Vec<u8>> {
        let data = self.conn.serialize(DatabaseName::Main)?;
        Ok(data.as_ref().to_vec())
    }

    /// Create every registered table that does not exist yet.
    pub fn apply_schema(&self) -> Result<()> {
        for table in ALL_TABLES {
            table.validate()?;
            self.conn.execute(&table.create_statement(), [])?;
        }
        Ok(())
    }

    pub fn table_exists(&self, table: &TableDef) -> Result<bool> {
        table_exists(&self.conn, table)
    }

    /// Full table scan, decoding each row through `R::decode`.
    ///
    /// A table that has not been created yet reads as empty. Rows that fail
    /// to decode are logged and skipped.
    pub fn select_all<R: Record>(&self) -> Result<Vec<R>> {
        let table = R::table();
        let records = select_all(&self.conn, table)?
            .iter()
            .filter_map(|row| match R::decode(row) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(table = table.name, error = %err, "skipping undecodable row");
                    None
                }
            })
            .collect();
        Ok(records)
    }

    /// Look up one row by primary key.
    pub fn select_one<R: Record>(&self, id: &str) -> Result<Option<R>> {
        let table = R::table();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            table.column_list(),
            table.name,
            table.primary_key().name
        );
        let row = self
            .conn
            .query_row(&sql, [id], |row| RowValues::from_sql(table, row))
            .optional()?;
        row.as_ref().map(R::decode).transpose()
    }

    pub fn upsert<R: Record>(&self, record: &R) -> Result<()> {
        upsert_row(&self.conn, &record.to_row()?)
    }

    /// Insert-or-replace many records in one transaction.
    pub fn upsert_all<R: Record>(&mut self, records: &[R]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for record in records {
            upsert_row(&tx, &record.to_row()?)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete a row by primary key and clear references to it.
    ///
    /// Returns the number of rows removed from `R`'s table (0 or 1).
    pub fn delete<R: Record>(&mut self, id: &str) -> Result<usize> {
        let table = R::table();
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?",
                table.name,
                table.primary_key().name
            ),
            [id],
        )?;
        for rule in schema::cascades_for(table.name) {
            let cleared = tx.execute(
                &format!(
                    "UPDATE {} SET {} = NULL WHERE {} = ?",
                    rule.dependent, rule.column, rule.column
                ),
                [id],
            )?;
            if cleared > 0 {
                tracing::debug!(
                    table = rule.dependent,
                    column = rule.column,
                    cleared,
                    "cleared references to deleted row"
                );
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    /// Run `f` inside one SQLite transaction.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let tx = self.conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    pub fn row_count(&self, table: &TableDef) -> Result<u64> {
        if !self.table_exists(table)? {
            return Ok(0);
        }
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Check SQLite's structural integrity.
    pub fn integrity_check(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if result != "ok" {
            return Err(BrainError::Storage(format!(
                "Integrity check failed: {}",
                result
            )));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn table_exists(conn: &Connection, table: &TableDef) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            [table.name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Delete every row of every registered table, keeping the tables.
pub(crate) fn clear_tables(conn: &Connection) -> Result<()> {
    for table in ALL_TABLES {
        if table_exists(conn, table)? {
            conn.execute(&format!("DELETE FROM {}", table.name), [])?;
        }
    }
    Ok(())
}

pub(crate) fn select_all(conn: &Connection, table: &'static TableDef) -> Result<Vec<RowValues>> {
    if !table_exists(conn, table)? {
        return Ok(Vec::new());
    }
    let sql = format!("SELECT {} FROM {}", table.column_list(), table.name);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| RowValues::from_sql(table, row))?;
    let mut values = Vec::new();
    for row in rows {
        values.push(row?);
    }
    Ok(values)
}

/// Insert-or-replace using exactly the columns present in `row`.
pub(crate) fn upsert_row(conn: &Connection, row: &EncodedRow) -> Result<()> {
    let names = row
        .columns
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
    let placeholders = vec!["?"; names.len()].join(", ");
    let sql = format!(
        "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
        row.table.name,
        names.join(", "),
        placeholders
    );
    conn.execute(&sql, params_from_iter(row.columns.iter().map(|(_, v)| v)))?;
    Ok(())
}

pub(crate) fn upsert_record<R: Record>(conn: &Connection, record: &R) -> Result<()> {
    upsert_row(conn, &record.to_row()?)
}

fn owned_data_from_bytes(bytes: &[u8]) -> Result<OwnedData> {
    if bytes.is_empty() {
        return Err(BrainError::Storage("SQLite image is empty".to_string()));
    }

    let size: i32 = bytes
        .len()
        .try_into()
        .map_err(|_| BrainError::Storage("SQLite image too large".to_string()))?;

    // SAFETY: sqlite3_malloc returns a valid pointer or null; null is checked
    // immediately below. `size` fits in i32 (validated above).
    let raw = unsafe { rusqlite::ffi::sqlite3_malloc(size) as *mut u8 };
    if raw.is_null() {
        return Err(BrainError::Storage("SQLite allocation failed".to_string()));
    }

    // SAFETY:
    // - `raw` is non-null and writable for `bytes.len()` bytes (allocated above with that size)
    // - `bytes` is valid for reads of `bytes.len()` bytes and cannot overlap fresh heap memory
    // - `OwnedData::from_raw_nonnull` takes ownership of the sqlite3_malloc'd buffer,
    //   which SQLite frees when the data is dropped or consumed by deserialize
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), raw, bytes.len());
        let ptr = NonNull::new(raw)
            .ok_or_else(|| BrainError::Storage("SQLite allocation returned null".to_string()))?;
        Ok(OwnedData::from_raw_nonnull(ptr, bytes.len()))
    }
}
