//! Repository Layer
//!
//! Key-value storage seam and the namespaced record repository on top of it.

mod error;
mod traits;
mod local_storage;
#[cfg(test)]
mod memory;
mod record_repo;


pub use error::{StoreError, StoreResult};
pub use traits::KeyValueStore;
pub use local_storage::LocalStorageStore;
#[cfg(test)]
pub use memory::MemoryStore;
pub use record_repo::{touches_namespace, RecordRepository};

use crate::config::AppConfig;

/// Record repository backed by the browser's `localStorage`.
pub fn browser_records(config: &AppConfig) -> StoreResult<RecordRepository<LocalStorageStore>> {
    let store = LocalStorageStore::open()?;
    Ok(RecordRepository::new(store, config.storage.prefix.clone()))
}
