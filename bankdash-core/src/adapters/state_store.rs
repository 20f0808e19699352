//! State store adapters
//!
//! - `JsonStateStore`: `state.json` in the data directory
//! - `MemoryStateStore`: process-local state for tests and one-off runs

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::domain::AppState;
use crate::ports::StateStore;

pub const STATE_FILE: &str = "state.json";
const LOCK_FILE: &str = "state.lock";

/// JSON file store
///
/// A missing or unreadable file loads as the default state. Writes go to a
/// temp file in the same directory and are renamed into place while holding
/// an exclusive lock, so concurrent CLI invocations never see a torn file.
/// `update` holds the same lock across its load and write.
pub struct JsonStateStore {
    dir: PathBuf,
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.to_path_buf(),
            path: data_dir.join(STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        fs::create_dir_all(&self.dir)?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        FileExt::lock_exclusive(&lock)?;

        let result = f();

        // Dropping the handle releases the lock as well
        let _ = FileExt::unlock(&lock);
        result
    }

    /// Write through a temp file and rename; callers hold the lock
    fn write(&self, state: &AppState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|e| Error::storage(format!("Failed to write {}: {}", STATE_FILE, e)))?;
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<AppState> {
        if !self.path.exists() {
            return Ok(AppState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        self.with_lock(|| self.write(state))
    }

    /// Load, change and write all run under the lock, so concurrent updates
    /// to different fields are never lost
    fn update(&self, change: &mut dyn FnMut(&mut AppState)) -> Result<AppState> {
        self.with_lock(|| {
            let mut state = self.load()?;
            change(&mut state);
            self.write(&state)?;
            Ok(state)
        })
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStateStore {
    state: Mutex<AppState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<AppState> {
        let state = self
            .state
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        Ok(state.clone())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let mut current = self
            .state
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        *current = state.clone();
        Ok(())
    }

    fn update(&self, change: &mut dyn FnMut(&mut AppState)) -> Result<AppState> {
        let mut current = self
            .state
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        change(&mut *current);
        Ok(current.clone())
    }
}
