use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use harbor_core::{InputField, InputStore, StoreError, StoredInputs};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::warn;

pub struct SqliteInputStore {
    pool: SqlitePool,
}

impl SqliteInputStore {
    /// Connect to `database_url` (e.g. `sqlite:inputs.db` or
    /// `sqlite::memory:`), creating the database file if missing.
    ///
    /// In-memory databases are held on a single connection so every query
    /// sees the same data.
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::Configuration(e.to_string()))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            pool_options = pool_options.max_connections(1);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to run migrations: {e}")))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn storage_error(err: sqlx::Error) -> StoreError {
    StoreError::Storage(err.to_string())
}

#[async_trait]
impl InputStore for SqliteInputStore {
    async fn get(
        &self,
        field: InputField,
    ) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM form_inputs WHERE key = ?")
            .bind(field.key())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.map(|row| row.try_get::<String, _>("value"))
            .transpose()
            .map_err(storage_error)
    }

    async fn set(
        &self,
        field: InputField,
        raw: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO form_inputs (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(field.key())
        .bind(raw)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn remove(
        &self,
        field: InputField,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM form_inputs WHERE key = ?")
            .bind(field.key())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM form_inputs")
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }

    async fn load_all(&self) -> Result<StoredInputs, StoreError> {
        let rows = sqlx::query("SELECT key, value FROM form_inputs")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("key").map_err(storage_error)?;
            let value: String = row.try_get("value").map_err(storage_error)?;
            match InputField::from_key(&key) {
                Some(field) => entries.push((field, value)),
                None => warn!(key = %key, "Ignoring unknown stored input"),
            }
        }

        Ok(StoredInputs::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> SqliteInputStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let store = SqliteInputStore::new_with_pool(pool).await;
        store
            .run_migrations()
            .await
            .expect("Failed to run migrations");

        store
    }

    #[tokio::test]
    async fn test_get_missing_field() {
        let store = setup_test_db().await;

        let result = store.get(InputField::PriorYearTax).await;

        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = setup_test_db().await;

        store
            .set(InputField::PriorYearTax, "$25,000")
            .await
            .expect("Failed to set");

        assert_eq!(
            store.get(InputField::PriorYearTax).await,
            Ok(Some("$25,000".to_string()))
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let store = setup_test_db().await;

        store.set(InputField::FilingStatus, "single").await.unwrap();
        store.set(InputField::FilingStatus, "married").await.unwrap();

        assert_eq!(
            store.get(InputField::FilingStatus).await,
            Ok(Some("married".to_string()))
        );
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM form_inputs")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_set_keeps_raw_text_verbatim() {
        let store = setup_test_db().await;

        store
            .set(InputField::CurrentYearProfit, "  about 200k ")
            .await
            .unwrap();

        assert_eq!(
            store.get(InputField::CurrentYearProfit).await,
            Ok(Some("  about 200k ".to_string()))
        );
    }

    #[tokio::test]
    async fn test_remove_field() {
        let store = setup_test_db().await;
        store.set(InputField::PriorYearAgi, "150000").await.unwrap();
        store.set(InputField::PriorYearTax, "25000").await.unwrap();

        store.remove(InputField::PriorYearAgi).await.unwrap();

        assert_eq!(store.get(InputField::PriorYearAgi).await, Ok(None));
        assert_eq!(
            store.get(InputField::PriorYearTax).await,
            Ok(Some("25000".to_string()))
        );
    }

    #[tokio::test]
    async fn test_load_all_with_defaults() {
        let store = setup_test_db().await;
        store.set(InputField::FilingStatus, "married").await.unwrap();
        store.set(InputField::CurrentYearProfit, "200000").await.unwrap();

        let inputs = store.load_all().await.unwrap();

        assert_eq!(
            inputs,
            StoredInputs {
                filing_status: "married".to_string(),
                current_year_profit: "200000".to_string(),
                ..StoredInputs::default()
            }
        );
    }

    #[tokio::test]
    async fn test_load_all_skips_unknown_keys() {
        let store = setup_test_db().await;
        sqlx::query(
            "INSERT INTO form_inputs (key, value, updated_at) VALUES ('email', 'a@b.c', '2026-01-01')",
        )
        .execute(store.pool())
        .await
        .expect("Failed to insert unknown key");

        let inputs = store.load_all().await.unwrap();

        assert_eq!(inputs, StoredInputs::default());
    }

    #[tokio::test]
    async fn test_clear_restores_defaults() {
        let store = setup_test_db().await;
        for field in InputField::all() {
            store.set(*field, "1").await.unwrap();
        }

        store.clear().await.unwrap();

        assert_eq!(store.load_all().await.unwrap(), StoredInputs::default());
    }

    #[tokio::test]
    async fn test_new_with_memory_url() {
        let store = SqliteInputStore::new("sqlite::memory:")
            .await
            .expect("Failed to connect");
        store.run_migrations().await.expect("Failed to migrate");

        store.set(InputField::PriorYearTax, "1").await.unwrap();

        assert_eq!(
            store.get(InputField::PriorYearTax).await,
            Ok(Some("1".to_string()))
        );
    }
}
