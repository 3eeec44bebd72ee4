//! In-memory character source
//!
//! Serves records from a map. Used for offline battles (`--roster`) and as
//! the test double for the roster builder, including scripted transient
//! failures.

use crate::core::error::{BattleError, FetchError};
use crate::core::types::CharacterId;
use crate::source::{CharacterRecord, CharacterSource, IdSpace};
use ahash::AHashMap;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct InMemorySource {
    records: AHashMap<CharacterId, CharacterRecord>,
    /// Remaining scripted failures per id
    failures: Mutex<AHashMap<CharacterId, u32>>,
    /// Every id requested, in order, including failed attempts
    requests: Mutex<Vec<CharacterId>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = CharacterRecord>) -> Self {
        let mut source = Self::new();
        for record in records {
            source.insert(record);
        }
        source
    }

    /// Load a JSON array of records
    pub fn from_json(json: &str) -> Result<Self, BattleError> {
        let records: Vec<CharacterRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, BattleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn insert(&mut self, record: CharacterRecord) {
        self.records.insert(record.id, record);
    }

    /// Make the next `times` fetches of `id` fail with a transport error
    pub fn fail_times(&self, id: CharacterId, times: u32) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(id, times);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest id held, for sizing the roster id space
    pub fn max_id(&self) -> Option<CharacterId> {
        self.records.keys().copied().max()
    }

    /// Ids requested so far, failed attempts included
    pub fn requests(&self) -> Vec<CharacterId> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn lookup(&self, id: CharacterId) -> Result<CharacterRecord, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(id);
        }

        if let Ok(mut failures) = self.failures.lock() {
            if let Some(remaining) = failures.get_mut(&id) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(FetchError::Transport(format!(
                        "scripted failure for character {}",
                        id
                    )));
                }
            }
        }

        self.records
            .get(&id)
            .cloned()
            .ok_or(FetchError::NotFound(id))
    }
}

impl CharacterSource for InMemorySource {
    async fn fetch(&self, id: CharacterId) -> Result<CharacterRecord, FetchError> {
        self.lookup(id)
    }

    /// Only ids actually held, so gaps in a roster file are never drawn
    fn id_space(&self, max_character_id: u32) -> IdSpace {
        let mut ids: Vec<CharacterId> = self
            .records
            .keys()
            .copied()
            .filter(|id| id.0 <= max_character_id)
            .collect();
        ids.sort();
        IdSpace::Listed(ids)
    }
}
