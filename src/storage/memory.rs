use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::errors::{FarmError, Result};

use super::{EntityKind, RecordStore};

/// Record store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<EntityKind, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-filled with raw documents, as imported from elsewhere.
    pub fn with_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = (EntityKind, Vec<Value>)>,
    {
        Self {
            collections: Mutex::new(documents.into_iter().collect()),
        }
    }
}

fn poisoned() -> FarmError {
    FarmError::StorageError("memory store lock poisoned".into())
}

impl RecordStore for MemoryStore {
    fn read_all(&self, kind: EntityKind) -> Result<Vec<Value>> {
        let guard = self.collections.lock().map_err(|_| poisoned())?;
        Ok(guard.get(&kind).cloned().unwrap_or_default())
    }

    fn write_all(&self, kind: EntityKind, records: Vec<Value>) -> Result<()> {
        let mut guard = self.collections.lock().map_err(|_| poisoned())?;
        guard.insert(kind, records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_collection_reads_empty() {
        let store = MemoryStore::new();
        assert!(store.read_all(EntityKind::Animal).unwrap().is_empty());
    }

    #[test]
    fn write_replaces_whole_collection() {
        let store = MemoryStore::with_documents([(
            EntityKind::HealthRecord,
            vec![json!({"a": 1}), json!({"a": 2})],
        )]);
        store
            .write_all(EntityKind::HealthRecord, vec![json!({"a": 3})])
            .unwrap();
        let docs = store.read_all(EntityKind::HealthRecord).unwrap();
        assert_eq!(docs, vec![json!({"a": 3})]);
        assert!(store.read_all(EntityKind::FeedRecord).unwrap().is_empty());
    }
}
