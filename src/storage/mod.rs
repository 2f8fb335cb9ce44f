pub mod memory;

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::domain::{
    Animal, CalvingRecord, FeedRecord, HealthRecord, Identifiable, InseminationRecord, MilkRecord,
    PregnancyCheckRecord, RecordId,
};
use crate::errors::Result;

pub use memory::MemoryStore;

/// Collections the farm core keeps in its record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Animal,
    MilkRecord,
    MilkSettings,
    FeedRecord,
    HealthRecord,
    Insemination,
    PregnancyCheck,
    Calving,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Animal,
        EntityKind::MilkRecord,
        EntityKind::MilkSettings,
        EntityKind::FeedRecord,
        EntityKind::HealthRecord,
        EntityKind::Insemination,
        EntityKind::PregnancyCheck,
        EntityKind::Calving,
    ];

    /// Stable key under which the collection is persisted.
    pub fn storage_key(self) -> &'static str {
        match self {
            EntityKind::Animal => "mooManagerAnimals",
            EntityKind::MilkRecord => "mooManagerMilkRecords",
            EntityKind::MilkSettings => "mooManagerMilkSettings",
            EntityKind::FeedRecord => "mooManagerFeedRecords",
            EntityKind::HealthRecord => "mooManagerHealthRecords",
            EntityKind::Insemination => "mooManagerInseminationRecords",
            EntityKind::PregnancyCheck => "mooManagerPregnancyChecks",
            EntityKind::Calving => "mooManagerCalvingRecords",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Whole-collection persistence for farm records.
///
/// Implementations hand back documents in any order and replace the entire
/// collection on write.
pub trait RecordStore: Send + Sync {
    fn read_all(&self, kind: EntityKind) -> Result<Vec<Value>>;
    fn write_all(&self, kind: EntityKind, records: Vec<Value>) -> Result<()>;
}

/// Record types that live in their own collection.
pub trait StoredRecord: Identifiable + Serialize + DeserializeOwned {
    const KIND: EntityKind;
}

impl StoredRecord for Animal {
    const KIND: EntityKind = EntityKind::Animal;
}

impl StoredRecord for MilkRecord {
    const KIND: EntityKind = EntityKind::MilkRecord;
}

impl StoredRecord for FeedRecord {
    const KIND: EntityKind = EntityKind::FeedRecord;
}

impl StoredRecord for HealthRecord {
    const KIND: EntityKind = EntityKind::HealthRecord;
}

impl StoredRecord for InseminationRecord {
    const KIND: EntityKind = EntityKind::Insemination;
}

impl StoredRecord for PregnancyCheckRecord {
    const KIND: EntityKind = EntityKind::PregnancyCheck;
}

impl StoredRecord for CalvingRecord {
    const KIND: EntityKind = EntityKind::Calving;
}

/// Typed working copy of one collection.
///
/// Documents that do not decode are skipped for reading but written back
/// untouched, so a mutation never drops data it could not understand.
pub struct Collection<T: StoredRecord> {
    records: Vec<T>,
    undecodable: Vec<Value>,
}

impl<T: StoredRecord> Collection<T> {
    pub fn load(store: &dyn RecordStore) -> Result<Self> {
        let documents = store.read_all(T::KIND)?;
        let mut records = Vec::with_capacity(documents.len());
        let mut undecodable = Vec::new();
        for document in documents {
            match serde_json::from_value::<T>(document.clone()) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(
                        collection = %T::KIND,
                        error = %err,
                        "Skipping undecodable record"
                    );
                    undecodable.push(document);
                }
            }
        }
        Ok(Self {
            records,
            undecodable,
        })
    }

    /// Decoded records only.
    pub fn read(store: &dyn RecordStore) -> Result<Vec<T>> {
        Ok(Self::load(store)?.records)
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn skipped(&self) -> usize {
        self.undecodable.len()
    }

    pub fn find(&self, id: &RecordId) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn find_mut(&mut self, id: &RecordId) -> Option<&mut T> {
        self.records.iter_mut().find(|record| record.id() == id)
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    /// Keeps records matching `keep` and returns how many were removed.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.records.len();
        self.records.retain(keep);
        before - self.records.len()
    }

    pub fn save(&self, store: &dyn RecordStore) -> Result<()> {
        let mut documents = Vec::with_capacity(self.records.len() + self.undecodable.len());
        for record in &self.records {
            documents.push(serde_json::to_value(record)?);
        }
        documents.extend(self.undecodable.iter().cloned());
        store.write_all(T::KIND, documents)
    }
}
