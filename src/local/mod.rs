//! Local persistence for collection snapshots.
//!
//! A single key-value table holds one JSON-serialized snapshot per
//! collection plus the config. It doubles as the last-known-good cache when
//! the remote is unreachable and as the live mirror in fallback mode.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::error::AppError;

/// Snapshot keys, one per collection.
pub mod keys {
    pub const DOCTORS: &str = "doctors";
    pub const DEPARTMENTS: &str = "departments";
    pub const SERVICES: &str = "services";
    pub const APPOINTMENTS: &str = "appointments";
    pub const NOTICES: &str = "notices";
    pub const CONFIG: &str = "hospital_config";
}

#[derive(Clone)]
pub struct LocalStore {
    db: SqlitePool,
}

impl LocalStore {
    pub async fn open(database_url: &str) -> Result<Self, AppError> {
        // In-memory SQLite gives each pooled connection its own database, so
        // tests must stay on a single connection.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { db: pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    pub async fn save<T>(&self, key: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO snapshots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(json)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn load<T>(&self, key: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM snapshots WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.db)
                .await?;

        match row {
            Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
