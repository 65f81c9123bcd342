//! SQLite-backed storage for worker skill records

pub mod error;

pub use error::{Result, StoreError};

use skillmap_types::{validate_levels, SkillLevel, WorkerRecord};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Persistent store of worker records, keyed by unique name.
///
/// Skill vectors are stored as JSON array text (`[4,3,1]`). Mutations are
/// serialized through `write_lock`; reads go straight to the pool.
pub struct WorkerStore {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl WorkerStore {
    /// Open (or create) the database file and ensure the schema exists
    pub async fn open(database_path: &str) -> Result<Self> {
        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = SqlitePool::connect(&database_url).await?;

        let store = Self::with_pool(pool).await?;
        info!("Worker store initialized with database: {}", database_path);
        Ok(store)
    }

    /// Private in-memory database, gone when the store is dropped
    pub async fn in_memory() -> Result<Self> {
        // Every pooled connection to :memory: is its own database, so keep one
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self {
            pool,
            write_lock: Mutex::new(()),
        };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create the workers table; safe to run against an existing database
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS workers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                skill_levels TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Database migrations completed");
        Ok(())
    }

    /// Insert a new worker; fails with `DuplicateName` if the name is taken
    /// and with `Invalid` if a level is out of range
    pub async fn add(&self, name: &str, skill_levels: &[SkillLevel]) -> Result<()> {
        validate_levels(skill_levels)?;
        let encoded = encode_levels(name, skill_levels)?;
        let _guard = self.write_lock.lock().await;

        sqlx::query("INSERT INTO workers (name, skill_levels) VALUES (?, ?)")
            .bind(name)
            .bind(encoded)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(e, name))?;

        info!("Added worker '{}' ({} levels)", name, skill_levels.len());
        Ok(())
    }

    /// All workers in creation order
    pub async fn get_all(&self) -> Result<Vec<WorkerRecord>> {
        let rows = sqlx::query("SELECT name, skill_levels FROM workers ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_row).collect()
    }

    /// Look up one worker; a missing name is `Ok(None)`
    pub async fn get_by_name(&self, name: &str) -> Result<Option<WorkerRecord>> {
        let row = sqlx::query("SELECT name, skill_levels FROM workers WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_row).transpose()
    }

    /// Rename a worker and replace their skill vector in a single statement.
    ///
    /// Fails with `DuplicateName` when `new_name` belongs to another worker and
    /// with `NotFound` when `old_name` does not exist. Out-of-range levels fail
    /// with `Invalid`. In every case nothing changes.
    pub async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        skill_levels: &[SkillLevel],
    ) -> Result<()> {
        validate_levels(skill_levels)?;
        let encoded = encode_levels(new_name, skill_levels)?;
        let _guard = self.write_lock.lock().await;

        let result = sqlx::query("UPDATE workers SET name = ?, skill_levels = ? WHERE name = ?")
            .bind(new_name)
            .bind(encoded)
            .bind(old_name)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(e, new_name))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(old_name.to_string()));
        }

        if old_name == new_name {
            info!("Updated worker '{}'", new_name);
        } else {
            info!("Updated worker '{}' (renamed from '{}')", new_name, old_name);
        }
        Ok(())
    }

    /// Remove a worker. Returns whether a row was deleted; absent names are a no-op.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let result = sqlx::query("DELETE FROM workers WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted worker '{}'", name);
        } else {
            debug!("Delete ignored, no worker named '{}'", name);
        }
        Ok(deleted)
    }

    pub async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workers")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Insert `records` only if the store holds no workers yet.
    /// Any out-of-range level rejects the whole batch.
    ///
    /// All records go in one transaction: a duplicate name rolls back the batch.
    /// Returns how many records were inserted.
    pub async fn seed_if_empty(&self, records: &[WorkerRecord]) -> Result<usize> {
        for record in records {
            validate_levels(&record.skill_levels)?;
        }
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workers")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            info!("Store already holds {} workers, skipping seed data", existing);
            return Ok(0);
        }

        for record in records {
            sqlx::query("INSERT INTO workers (name, skill_levels) VALUES (?, ?)")
                .bind(&record.name)
                .bind(encode_levels(&record.name, &record.skill_levels)?)
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::from_write(e, &record.name))?;
        }

        tx.commit().await?;
        info!("Seeded {} workers", records.len());
        Ok(records.len())
    }

    /// Write a consistent copy of the database to `destination`
    pub async fn backup(&self, destination: &Path) -> Result<()> {
        let target = destination.to_string_lossy().into_owned();
        if destination.exists() {
            return Err(StoreError::BackupExists(target));
        }

        let _guard = self.write_lock.lock().await;
        sqlx::query("VACUUM INTO ?")
            .bind(&target)
            .execute(&self.pool)
            .await?;

        info!("Database backed up to {}", target);
        Ok(())
    }
}

fn encode_levels(name: &str, skill_levels: &[SkillLevel]) -> Result<String> {
    serde_json::to_string(skill_levels).map_err(|source| StoreError::Encoding {
        name: name.to_string(),
        source,
    })
}

fn decode_row(row: &SqliteRow) -> Result<WorkerRecord> {
    let name: String = row.try_get("name")?;
    let encoded: String = row.try_get("skill_levels")?;
    let skill_levels = serde_json::from_str(&encoded).map_err(|source| StoreError::Encoding {
        name: name.clone(),
        source,
    })?;
    Ok(WorkerRecord { name, skill_levels })
}
