//! Persistence of attribute records.
//!
//! Only `(template, base, modifier, current)` per attribute is stored; edges
//! are rebuilt from templates whenever a character is loaded.

mod file;
mod memory;

pub use file::FileRecordStore;
pub use memory::MemoryRecordStore;

use attribute_core::{AttributeRecord, CharacterAttributes};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid character name '{0}'")]
    InvalidName(String),

    #[error("failed to restore character '{character}': {source}")]
    Restore {
        character: String,
        #[source]
        source: attribute_core::AttributeError,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Saved attribute state of one character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCharacter {
    pub character: String,
    pub records: Vec<AttributeRecord>,
}

impl SavedCharacter {
    pub fn capture(character: impl Into<String>, sheet: &CharacterAttributes) -> Self {
        Self {
            character: character.into(),
            records: sheet.records(),
        }
    }

    /// Applies the saved records onto a freshly built sheet.
    pub fn restore(&self, sheet: &mut CharacterAttributes) -> Result<()> {
        sheet
            .apply_records(&self.records)
            .map_err(|source| StoreError::Restore {
                character: self.character.clone(),
                source,
            })
    }
}

/// Storage for saved characters, keyed by character name.
pub trait RecordStore {
    fn save(&mut self, saved: &SavedCharacter) -> Result<()>;

    fn load(&self, character: &str) -> Result<Option<SavedCharacter>>;

    fn exists(&self, character: &str) -> bool;

    fn delete(&mut self, character: &str) -> Result<()>;

    /// Stored character names in ascending order.
    fn list(&self) -> Result<Vec<String>>;
}
