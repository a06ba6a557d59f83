use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::input_store::{InputField, InputStore, StoreError};

/// Process-local store; contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryInputStore {
    values: Mutex<HashMap<InputField, String>>,
}

impl MemoryInputStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> Result<MutexGuard<'_, HashMap<InputField, String>>, StoreError> {
        self.values
            .lock()
            .map_err(|e| StoreError::Storage(format!("input store lock poisoned: {e}")))
    }
}

#[async_trait]
impl InputStore for MemoryInputStore {
    async fn get(
        &self,
        field: InputField,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.values()?.get(&field).cloned())
    }

    async fn set(
        &self,
        field: InputField,
        raw: &str,
    ) -> Result<(), StoreError> {
        self.values()?.insert(field, raw.to_string());
        Ok(())
    }

    async fn remove(
        &self,
        field: InputField,
    ) -> Result<(), StoreError> {
        self.values()?.remove(&field);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.values()?.clear();
        Ok(())
    }
}
