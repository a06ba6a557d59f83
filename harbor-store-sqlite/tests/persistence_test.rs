//! Values written through one store survive reopening the database file.

use std::path::PathBuf;

use harbor_core::{InputField, InputStore, StoreConfig, StoreFactory, StoredInputs};
use harbor_store_sqlite::SqliteStoreFactory;
use pretty_assertions::assert_eq;

struct TempDb(PathBuf);

impl TempDb {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "harbor-store-{}-{}.db",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Self(path)
    }

    fn config(&self) -> StoreConfig {
        StoreConfig {
            backend: "sqlite".to_string(),
            connection_string: self.0.display().to_string(),
        }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

#[tokio::test]
async fn test_inputs_survive_reopen() {
    let db = TempDb::new("reopen");

    {
        let store = SqliteStoreFactory
            .create(&db.config())
            .await
            .expect("Failed to create store");
        store.set(InputField::FilingStatus, "married").await.unwrap();
        store.set(InputField::PriorYearTax, "$25,000").await.unwrap();
    }

    let store = SqliteStoreFactory
        .create(&db.config())
        .await
        .expect("Failed to reopen store");
    let inputs = store.load_all().await.unwrap();

    assert_eq!(
        inputs,
        StoredInputs {
            filing_status: "married".to_string(),
            prior_year_tax: "$25,000".to_string(),
            ..StoredInputs::default()
        }
    );
}

#[tokio::test]
async fn test_clear_persists() {
    let db = TempDb::new("clear");

    {
        let store = SqliteStoreFactory.create(&db.config()).await.unwrap();
        store.set(InputField::CurrentYearProfit, "200000").await.unwrap();
        store.clear().await.unwrap();
    }

    let store = SqliteStoreFactory.create(&db.config()).await.unwrap();

    assert_eq!(store.load_all().await.unwrap(), StoredInputs::default());
}
