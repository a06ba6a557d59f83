//! Persistence of the raw form inputs between sessions.
//!
//! The engine never touches a store; callers load [`StoredInputs`], turn them
//! into [`crate::TaxInputs`] and hand those to the engine.

pub mod factory;
pub mod input_store;
pub mod memory;

pub use factory::{MemoryStoreFactory, StoreConfig, StoreFactory, StoreRegistry};
pub use input_store::{InputField, InputStore, StoreError, StoredInputs};
pub use memory::MemoryInputStore;
