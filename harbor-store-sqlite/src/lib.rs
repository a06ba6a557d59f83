//! SQLite backend for the persisted form inputs.

mod factory;
mod repository;

pub use factory::SqliteStoreFactory;
pub use repository::SqliteInputStore;
