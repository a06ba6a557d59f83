use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::input_store::{InputStore, StoreError};
use super::memory::MemoryInputStore;

/// Backend-agnostic store configuration.
///
/// `backend` must match the [`StoreFactory::backend_name`] of a registered
/// factory. `connection_string` is forwarded to that factory unchanged.
///
/// | backend  | connection_string examples             |
/// |----------|----------------------------------------|
/// | `memory` | ignored                                |
/// | `sqlite` | `inputs.db`, `sqlite::memory:`         |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: MemoryStoreFactory::BACKEND.to_string(),
            connection_string: String::new(),
        }
    }
}

/// One implementation per storage backend, registered with a
/// [`StoreRegistry`] at startup.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open the backend and return a ready-to-use store.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn InputStore>, StoreError>;
}

pub struct MemoryStoreFactory;

impl MemoryStoreFactory {
    pub const BACKEND: &'static str = "memory";
}

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        Self::BACKEND
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn InputStore>, StoreError> {
        Ok(Box::new(MemoryInputStore::new()))
    }
}

/// Registry of [`StoreFactory`] instances, keyed by backend name.
pub struct StoreRegistry {
    factories: HashMap<&'static str, Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the in-memory backend already registered.
    pub fn with_memory() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MemoryStoreFactory));
        registry
    }

    /// Register a backend factory, replacing any with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn StoreFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`StoreError::Configuration`] when no factory is registered for the
    ///   requested backend.
    /// * Any error the chosen factory returns.
    pub async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn InputStore>, StoreError> {
        let factory = self.factories.get(config.backend.as_str()).ok_or_else(|| {
            StoreError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            ))
        })?;

        tracing::debug!(backend = %config.backend, "Opening input store");
        factory.create(config).await
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}
