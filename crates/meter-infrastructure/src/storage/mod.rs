//! Storage primitives.

pub mod atomic_json;
pub mod json_store;

pub use atomic_json::{AtomicJsonFile, StorageError};
pub use json_store::JsonFileStore;
