//! The save store collaborator.
//!
//! The engine's `save` and `load` commands hand a [`Snapshot`] to a
//! [`SaveStore`] and take one back; durability is entirely the store's concern.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tale_core::{GameState, World};
use thiserror::Error;

/// Result type for save store operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors raised by save stores.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Save names may only use ASCII letters, digits, `-` and `_`.
    #[error("invalid save name: '{0}'")]
    InvalidName(String),

    /// Filesystem failure.
    #[error("save store I/O error: {0}")]
    Io(#[from] io::Error),

    /// A save file could not be encoded or decoded.
    #[error("save file is not valid: {0}")]
    Format(#[from] serde_json::Error),
}

/// Everything needed to resume a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The session state.
    pub state: GameState,
    /// The world including current item and enemy placement.
    pub world: World,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    /// Capture state and world now.
    pub fn new(state: GameState, world: World) -> Self {
        Self {
            state,
            world,
            saved_at: Utc::now(),
        }
    }
}

/// Storage for named snapshots.
pub trait SaveStore: Send {
    /// Store a snapshot under a name, replacing any previous one. Returns the
    /// save id.
    fn save(&mut self, name: &str, snapshot: &Snapshot) -> PersistenceResult<String>;

    /// Fetch a snapshot by name.
    fn load(&self, name: &str) -> PersistenceResult<Option<Snapshot>>;

    /// Names of all stored snapshots, sorted.
    fn list(&self) -> PersistenceResult<Vec<String>>;
}

/// Check a save name is a safe, non-empty slot identifier.
pub fn validate_save_name(name: &str) -> PersistenceResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidName(name.to_string()))
    }
}

/// Keeps snapshots in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    saves: BTreeMap<String, Snapshot>,
}

impl MemorySaveStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemorySaveStore {
    fn save(&mut self, name: &str, snapshot: &Snapshot) -> PersistenceResult<String> {
        validate_save_name(name)?;
        self.saves.insert(name.to_string(), snapshot.clone());
        Ok(name.to_string())
    }

    fn load(&self, name: &str) -> PersistenceResult<Option<Snapshot>> {
        validate_save_name(name)?;
        Ok(self.saves.get(name).cloned())
    }

    fn list(&self) -> PersistenceResult<Vec<String>> {
        Ok(self.saves.keys().cloned().collect())
    }
}

/// Writes each snapshot as a pretty-printed JSON file in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileSaveStore {
    dir: PathBuf,
}

impl JsonFileSaveStore {
    /// Use `dir` for save files, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> PersistenceResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory holding save files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PersistenceResult<PathBuf> {
        validate_save_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl SaveStore for JsonFileSaveStore {
    fn save(&mut self, name: &str, snapshot: &Snapshot) -> PersistenceResult<String> {
        let path = self.path_for(name)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)?;
        Ok(name.to_string())
    }

    fn load(&self, name: &str) -> PersistenceResult<Option<Snapshot>> {
        let path = self.path_for(name)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn list(&self) -> PersistenceResult<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .filter(|name| validate_save_name(name).is_ok())
            .collect();
        names.sort();
        Ok(names)
    }
}
