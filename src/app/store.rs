// Sayaç CRM - app/store.rs
//
// Durable record store: the in-memory record list plus write-through
// persistence to a key-value storage backend.
//
// Design principles:
// - The in-memory list is the source of truth for the session. Every
//   mutation computes a new list from the old one and hands it to
//   `replace`, which swaps it in and then persists the whole list.
// - Load never surfaces errors. A record that does not fit the schema is
//   skipped; a slot that is not a JSON array yields an empty list. Either
//   way the raw slot is copied to a backup slot before anything overwrites
//   it.
// - A failed write is returned to the caller for logging; the in-memory list
//   keeps the new state and the next successful write catches storage up.
// - No partial writes and no migration of legacy shapes.

use crate::core::model::{Pipeline, Record, RecordEdit};
use crate::util::constants::{RECORDS_BACKUP_KEY, RECORDS_KEY};
use crate::util::error::StorageError;
use std::collections::HashMap;
use uuid::Uuid;

// =============================================================================
// Storage backends
// =============================================================================

/// A key-value durable medium holding opaque text slots.
pub trait StorageBackend {
    /// Read a slot. `None` when the slot is absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite a slot with `value`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory backend for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Record store
// =============================================================================

/// The record list and the backend it is persisted to.
#[derive(Debug)]
pub struct RecordStore<B: StorageBackend> {
    backend: B,
    records: Vec<Record>,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Open the store, loading whatever list the backend holds.
    ///
    /// When part or all of the stored slot could not be read, the raw slot
    /// is copied to [`RECORDS_BACKUP_KEY`] first, so the next write cannot
    /// destroy records that only failed to parse.
    pub fn open(mut backend: B) -> Self {
        let loaded = read_slot(&backend);

        if let Some(raw) = loaded.unreadable_raw() {
            match backend.set(RECORDS_BACKUP_KEY, raw) {
                Ok(()) => tracing::warn!(
                    backup = RECORDS_BACKUP_KEY,
                    skipped = loaded.skipped,
                    "Unreadable stored records copied to backup slot"
                ),
                Err(e) => tracing::error!(
                    backup = RECORDS_BACKUP_KEY,
                    error = %e,
                    "Could not back up unreadable stored records"
                ),
            }
        }

        Self {
            backend,
            records: loaded.records,
        }
    }

    /// Read the record list from `backend`.
    ///
    /// Records that do not match the schema are skipped; an absent slot or
    /// one that is not a JSON array gives an empty list. Never fails.
    pub fn load(backend: &B) -> Vec<Record> {
        read_slot(backend).records
    }

    /// Current list, newest first by convention.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Swap in `new_list` and persist it, overwriting the stored slot.
    ///
    /// The in-memory list is replaced even when the write fails.
    pub fn replace(&mut self, new_list: Vec<Record>) -> Result<(), StorageError> {
        self.records = new_list;
        self.persist()
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.records).map_err(|e| StorageError::Serialise {
            key: RECORDS_KEY.to_string(),
            source: e,
        })?;
        self.backend.set(RECORDS_KEY, &json)?;
        tracing::debug!(count = self.records.len(), "Records persisted");
        Ok(())
    }

    /// Put a newly completed record at the front of the list.
    pub fn prepend(&mut self, record: Record) -> Result<(), StorageError> {
        if self.get(record.id).is_some() {
            return Err(StorageError::DuplicateId {
                id: record.id.to_string(),
            });
        }

        let mut new_list = Vec::with_capacity(self.records.len() + 1);
        new_list.push(record);
        new_list.extend(self.records.iter().cloned());
        self.replace(new_list)
    }

    /// Move a record to another pipeline stage.
    pub fn set_pipeline(&mut self, id: Uuid, stage: Pipeline) -> Result<(), StorageError> {
        let new_list = self.map_one(id, |r| Record {
            pipeline: stage,
            ..r.clone()
        })?;
        tracing::info!(%id, stage = stage.label(), "Pipeline stage changed");
        self.replace(new_list)
    }

    /// Save a full field edit. Segment, churn risk, and numeric price are
    /// re-derived; `id` and `created_at` are kept.
    pub fn apply_edit(&mut self, id: Uuid, edit: RecordEdit) -> Result<&Record, StorageError> {
        let new_list = self.map_one(id, |r| r.with_edit(edit.clone()))?;
        self.replace(new_list)?;
        tracing::info!(%id, "Record edited");
        self.get(id).ok_or(StorageError::NotFound { id: id.to_string() })
    }

    /// Remove a record after `confirm` approves it.
    ///
    /// Returns `Ok(false)` (list unchanged, nothing written) when the record
    /// does not exist or the confirmation is declined.
    pub fn remove<F>(&mut self, id: Uuid, confirm: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&Record) -> bool,
    {
        let Some(record) = self.get(id) else {
            return Ok(false);
        };
        if !confirm(record) {
            tracing::debug!(%id, "Removal declined");
            return Ok(false);
        }

        let new_list = self.records.iter().filter(|r| r.id != id).cloned().collect();
        self.replace(new_list)?;
        tracing::info!(%id, "Record removed");
        Ok(true)
    }

    fn map_one<F>(&self, id: Uuid, f: F) -> Result<Vec<Record>, StorageError>
    where
        F: Fn(&Record) -> Record,
    {
        if self.get(id).is_none() {
            return Err(StorageError::NotFound { id: id.to_string() });
        }
        Ok(self
            .records
            .iter()
            .map(|r| if r.id == id { f(r) } else { r.clone() })
            .collect())
    }
}

// =============================================================================
// Slot decoding
// =============================================================================

/// Outcome of reading the records slot.
struct LoadedSlot {
    records: Vec<Record>,
    raw: Option<String>,
    skipped: usize,
    malformed: bool,
}

impl LoadedSlot {
    /// The raw slot text when any of it was lost in decoding.
    fn unreadable_raw(&self) -> Option<&str> {
        if self.malformed || self.skipped > 0 {
            self.raw.as_deref()
        } else {
            None
        }
    }
}

/// Decode the records slot element by element.
fn read_slot<B: StorageBackend>(backend: &B) -> LoadedSlot {
    let Some(raw) = backend.get(RECORDS_KEY) else {
        tracing::debug!(key = RECORDS_KEY, "No stored records; starting empty");
        return LoadedSlot {
            records: Vec::new(),
            raw: None,
            skipped: 0,
            malformed: false,
        };
    };

    let elements = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(elements) => elements,
        Err(e) => {
            tracing::warn!(
                key = RECORDS_KEY,
                error = %e,
                "Stored records are malformed; starting empty"
            );
            return LoadedSlot {
                records: Vec::new(),
                raw: Some(raw),
                skipped: 0,
                malformed: true,
            };
        }
    };

    let total = elements.len();
    let records: Vec<Record> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Record>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable stored record");
                None
            }
        })
        .collect();

    let skipped = total - records.len();
    tracing::info!(count = records.len(), skipped, "Records loaded");

    LoadedSlot {
        records,
        raw: Some(raw),
        skipped,
        malformed: false,
    }
}

// =============================================================================
// Unit tests
// =============================================================================
