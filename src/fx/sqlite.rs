//! FX series storage with SQLite

use super::base::SeriesStore;
use super::series::PriceSeries;
use crate::error::{FxError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::path::Path;

/// Series store backed by a single `fx_prices` table
pub struct SqliteSeriesStore {
    conn: Connection,
}

impl SqliteSeriesStore {
    /// Create or open database at path
    pub fn new(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| FxError::Storage(format!("Failed to open database: {}", e)))?;

        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    /// Create in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            FxError::Storage(format!("Failed to create in-memory database: {}", e))
        })?;

        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS fx_prices (
                    code TEXT NOT NULL,
                    datetime TEXT NOT NULL,
                    price REAL NOT NULL,
                    PRIMARY KEY (code, datetime)
                )",
                [],
            )
            .map_err(|e| FxError::Storage(format!("Failed to create fx_prices table: {}", e)))?;

        Ok(())
    }
}

impl SeriesStore for SqliteSeriesStore {
    fn list_codes(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT code FROM fx_prices")
            .map_err(|e| FxError::Storage(format!("Failed to prepare query: {}", e)))?;

        let codes = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| FxError::Storage(format!("Failed to query codes: {}", e)))?
            .collect::<std::result::Result<BTreeSet<_>, _>>()
            .map_err(|e| FxError::Storage(format!("Failed to collect codes: {}", e)))?;

        Ok(codes)
    }

    fn has_code(&self, code: &str) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM fx_prices WHERE code = ?1)",
                params![code],
                |row| row.get(0),
            )
            .map_err(|e| FxError::Storage(format!("Failed to check code {}: {}", code, e)))
    }

    fn read(&self, code: &str) -> Result<PriceSeries> {
        let mut stmt = self
            .conn
            .prepare("SELECT datetime, price FROM fx_prices WHERE code = ?1 ORDER BY datetime")
            .map_err(|e| FxError::Storage(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![code], |row| {
                Ok((row.get::<_, DateTime<Utc>>(0)?, row.get::<_, f64>(1)?))
            })
            .map_err(|e| FxError::Storage(format!("Failed to query prices: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| FxError::Storage(format!("Failed to collect prices: {}", e)))?;

        if rows.is_empty() {
            return Err(FxError::NonexistentEntry(code.to_string()));
        }

        PriceSeries::from_observations(rows)
    }

    fn write(&mut self, code: &str, series: &PriceSeries) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| FxError::Storage(format!("Failed to begin transaction: {}", e)))?;

        tx.execute("DELETE FROM fx_prices WHERE code = ?1", params![code])
            .map_err(|e| FxError::Storage(format!("Failed to replace {}: {}", code, e)))?;

        {
            let mut stmt = tx
                .prepare("INSERT INTO fx_prices (code, datetime, price) VALUES (?1, ?2, ?3)")
                .map_err(|e| FxError::Storage(format!("Failed to prepare insert: {}", e)))?;

            for (dt, rate) in series.iter() {
                stmt.execute(params![code, dt, rate])
                    .map_err(|e| FxError::Storage(format!("Failed to insert price: {}", e)))?;
            }
        }

        tx.commit()
            .map_err(|e| FxError::Storage(format!("Failed to commit {}: {}", code, e)))
    }

    fn erase(&mut self, code: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM fx_prices WHERE code = ?1", params![code])
            .map_err(|e| FxError::Storage(format!("Failed to delete {}: {}", code, e)))?;
        Ok(())
    }
}
