//! In-memory record store for tests and throwaway sessions.

use std::collections::BTreeMap;

use super::{RecordStore, Result, SavedCharacter};

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    saves: BTreeMap<String, SavedCharacter>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn save(&mut self, saved: &SavedCharacter) -> Result<()> {
        self.saves.insert(saved.character.clone(), saved.clone());
        Ok(())
    }

    fn load(&self, character: &str) -> Result<Option<SavedCharacter>> {
        Ok(self.saves.get(character).cloned())
    }

    fn exists(&self, character: &str) -> bool {
        self.saves.contains_key(character)
    }

    fn delete(&mut self, character: &str) -> Result<()> {
        self.saves.remove(character);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.saves.keys().cloned().collect())
    }
}
