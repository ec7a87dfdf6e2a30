//! Record Repository
//!
//! Stores each checklist as JSON under `prefix + code`. Keys without the
//! prefix belong to someone else and are never read or removed.

use super::{KeyValueStore, StoreError, StoreResult};
use crate::models::{Checklist, Record};

pub struct RecordRepository<S> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> RecordRepository<S> {
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Underlying storage area
    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Storage key for `code`
    pub fn key_for(&self, code: &str) -> String {
        format!("{}{}", self.prefix, code)
    }

    /// The code stored under `key`, if `key` is one of ours
    pub fn code_of<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.prefix.as_str())
            .filter(|code| !code.is_empty())
    }

    /// Checklist stored for `code`.
    ///
    /// `Ok(None)` if nothing is stored, `Err(Malformed)` if the stored value
    /// is not a valid checklist.
    pub fn find(&self, code: &str) -> StoreResult<Option<Checklist>> {
        let key = self.key_for(code);
        match self.store.get(&key)? {
            Some(raw) => parse_checklist(&key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Write `record`, replacing whatever was stored for its code.
    pub fn save(&self, record: &Record) -> StoreResult<()> {
        let json = serde_json::to_string(&record.checklist)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.set(&self.key_for(&record.code), &json)
    }

    /// Every record in the namespace, ordered by code.
    ///
    /// Entries that fail to parse are logged and skipped.
    pub fn list(&self) -> StoreResult<Vec<Record>> {
        let mut records = Vec::new();
        for key in self.store.keys()? {
            let Some(code) = self.code_of(&key) else { continue };
            let Some(raw) = self.store.get(&key)? else { continue };

            match parse_checklist(&key, &raw) {
                Ok(checklist) => records.push(Record::new(code, checklist)),
                Err(err) => tracing::error!(key = %key, "skipping entry: {}", err),
            }
        }
        records.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(records)
    }

    /// Remove every namespaced entry; returns how many were removed.
    pub fn clear(&self) -> StoreResult<usize> {
        // Collect first: removing while walking `localStorage` shifts indices
        let ours: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(self.prefix.as_str()))
            .collect();

        for key in &ours {
            self.store.remove(key)?;
        }
        tracing::info!(removed = ours.len(), "cleared records");
        Ok(ours.len())
    }
}

/// Whether a storage-change notification concerns records under `prefix`.
///
/// A `None` key means the whole storage area was cleared.
pub fn touches_namespace(changed_key: Option<&str>, prefix: &str) -> bool {
    match changed_key {
        None => true,
        Some(key) => key.starts_with(prefix),
    }
}

fn parse_checklist(key: &str, raw: &str) -> StoreResult<Checklist> {
    serde_json::from_str(raw).map_err(|e| StoreError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
