//! Local records: best coin count and selected skin
//!
//! Stored as plain string values under fixed keys, so the same layout works
//! for a browser-style key/value store and a JSON file on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::RecordsError;
use crate::settings::Skin;

/// Key for the best coin count
pub const HIGH_SCORE_KEY: &str = "endless-runner-high-score";
/// Key for the selected skin identifier
pub const SELECTED_SKIN_KEY: &str = "endless-runner-selected-skin";

/// String key/value storage
pub trait RecordStore {
    fn get(&self, key: &str) -> Result<Option<String>, RecordsError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), RecordsError>;
}

/// In-memory store (tests, throwaway sessions)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, RecordsError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), RecordsError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One JSON object on disk, rewritten on every `set`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordsError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            log::info!("No records at {}, starting fresh", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl RecordStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, RecordsError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), RecordsError> {
        self.values.insert(key.to_owned(), value.to_owned());
        let json = serde_json::to_string_pretty(&self.values)?;
        // Write aside then rename, so a crash never leaves a truncated file
        let tmp = self.temp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Records for this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalRecords {
    pub high_score: u32,
    pub selected_skin: Skin,
}

impl LocalRecords {
    /// Read both records. Unparseable values fall back to defaults.
    pub fn load(store: &impl RecordStore) -> Result<Self, RecordsError> {
        let high_score = match store.get(HIGH_SCORE_KEY)? {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring malformed high score {raw:?}");
                0
            }),
            None => 0,
        };
        let selected_skin = store
            .get(SELECTED_SKIN_KEY)?
            .map(|id| Skin::from_id_or_default(&id))
            .unwrap_or_default();

        log::info!(
            "Loaded records (high score {high_score}, skin {})",
            selected_skin.as_str()
        );
        Ok(Self {
            high_score,
            selected_skin,
        })
    }

    pub fn save(&self, store: &mut impl RecordStore) -> Result<(), RecordsError> {
        store.set(HIGH_SCORE_KEY, &self.high_score.to_string())?;
        store.set(SELECTED_SKIN_KEY, self.selected_skin.as_str())?;
        Ok(())
    }

    /// Strictly greater than the stored best
    pub fn is_new_record(&self, score: u32) -> bool {
        score > self.high_score
    }

    /// Record a finished run's coin count; returns true on a new record
    pub fn record_run(&mut self, score: u32) -> bool {
        if !self.is_new_record(score) {
            return false;
        }
        log::info!("New high score: {score} (was {})", self.high_score);
        self.high_score = score;
        true
    }

    pub fn select_skin(&mut self, skin: Skin) {
        self.selected_skin = skin;
    }
}
