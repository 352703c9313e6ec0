//! Bulk medicine store backed by SQLite.
//!
//! This is the fallback tier of the medicine directory. Its single table
//! is populated by the external openFDA label import; this module owns the
//! table contract (normalized-name primary key, first-wins inserts) and
//! read access.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::{info, instrument};

use crate::core::directory::{MedicineSource, StoreError};
use crate::models::{normalize_name, MedicineRecord};

pub mod import;

/// Connection to the bulk `medicines` table.
pub struct MedicineStore {
    pool: SqlitePool,
}

impl MedicineStore {
    /// Open (or create) the store at the given sqlx URL and ensure the
    /// schema exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        // One connection: an in-memory SQLite database exists per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS medicines (
                name TEXT PRIMARY KEY,
                description TEXT,
                uses TEXT,
                side_effects TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a record under its normalized name, keeping any existing row
    /// (duplicate keys never overwrite). Returns whether a row was added.
    #[instrument(skip(self, record), fields(name = %record.name))]
    pub async fn insert_ignore(&self, record: &MedicineRecord) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO medicines (name, description, uses, side_effects)
             VALUES (?, ?, ?, ?)",
        )
        .bind(normalize_name(&record.name))
        .bind(&record.description)
        .bind(&record.uses)
        .bind(&record.side_effects)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Exact-match lookup on the normalized name.
    #[instrument(skip(self), fields(drug = %name))]
    pub async fn get(&self, name: &str) -> Result<Option<MedicineRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT name, description, uses, side_effects FROM medicines WHERE name = ?",
        )
        .bind(normalize_name(name))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(MedicineRecord {
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                uses: row.try_get("uses")?,
                side_effects: row.try_get("side_effects")?,
            })),
            None => Ok(None),
        }
    }

    /// Number of imported records.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM medicines")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("n")?)
    }

    /// Drop all imported records, as the external importer does before a
    /// fresh load.
    pub async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM medicines")
            .execute(&self.pool)
            .await?;

        info!("bulk medicine store cleared");
        Ok(())
    }
}

#[async_trait]
impl MedicineSource for MedicineStore {
    async fn get(&self, name: &str) -> Result<Option<MedicineRecord>, StoreError> {
        MedicineStore::get(self, name).await
    }
}
