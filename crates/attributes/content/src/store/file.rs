//! File-based record store.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RecordStore, Result, SavedCharacter, StoreError};

/// Stores each character as `{name}.bin` in bincode format.
///
/// Writes go to a temporary file first and are renamed into place.
pub struct FileRecordStore {
    base_dir: PathBuf,
}

impl FileRecordStore {
    /// Create a new file-based record store, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn record_path(&self, character: &str) -> Result<PathBuf> {
        let valid = !character.is_empty()
            && character
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidName(character.to_owned()));
        }
        Ok(self.base_dir.join(format!("{}.bin", character)))
    }
}

impl RecordStore for FileRecordStore {
    fn save(&mut self, saved: &SavedCharacter) -> Result<()> {
        let path = self.record_path(&saved.character)?;
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(saved).map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved character '{}' to {}", saved.character, path.display());
        Ok(())
    }

    fn load(&self, character: &str) -> Result<Option<SavedCharacter>> {
        let path = self.record_path(character)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let saved: SavedCharacter =
            bincode::deserialize(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;

        tracing::debug!("Loaded character '{}' from {}", character, path.display());
        Ok(Some(saved))
    }

    fn exists(&self, character: &str) -> bool {
        self.record_path(character)
            .is_ok_and(|path| path.exists())
    }

    fn delete(&mut self, character: &str) -> Result<()> {
        let path = self.record_path(character)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted character '{}'", character);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(name) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(".bin"))
            {
                names.push(name.to_owned());
            }
        }
        names.sort_unstable();
        Ok(names)
    }
}
