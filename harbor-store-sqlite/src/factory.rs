use async_trait::async_trait;
use harbor_core::{InputStore, StoreConfig, StoreError, StoreFactory};

use crate::repository::SqliteInputStore;

/// Turns a connection string into a sqlx SQLite URL.
///
/// * `sqlite:...` URLs are used as given.
/// * `:memory:` or an empty string opens an in-memory database.
/// * Anything else is a file path, created if it does not exist.
fn database_url(connection_string: &str) -> String {
    let trimmed = connection_string.trim();
    if trimmed.starts_with("sqlite:") {
        trimmed.to_string()
    } else if trimmed.is_empty() || trimmed == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{trimmed}?mode=rwc")
    }
}

/// [`StoreFactory`] for SQLite.
///
/// ```rust,no_run
/// use harbor_core::StoreRegistry;
/// use harbor_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::with_memory();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

impl SqliteStoreFactory {
    pub const BACKEND: &'static str = "sqlite";
}

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        Self::BACKEND
    }

    /// Open the database named by `config.connection_string` and run
    /// migrations.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn InputStore>, StoreError> {
        let store = SqliteInputStore::new(&database_url(&config.connection_string)).await?;
        store.run_migrations().await?;
        Ok(Box::new(store))
    }
}
