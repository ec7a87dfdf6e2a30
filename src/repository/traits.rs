//! Repository Layer - Core Traits
//!
//! Abstract string key-value storage. Implementations: `localStorage`,
//! in-memory.

use super::StoreResult;

/// Flat string key-value storage area.
///
/// Methods take `&self`; backends use interior mutability the way the browser
/// storage object does.
pub trait KeyValueStore {
    /// Value stored under `key`, if any
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Every key currently in the storage area
    fn keys(&self) -> StoreResult<Vec<String>>;
}
