//! JSON state file persistence

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::state::{State, STATE_VERSION};

/// File name of the persisted record inside the state directory
pub const STATE_FILE: &str = "directrix-state.json";

/// Reads and writes the environment record in a state directory
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    /// Load the record, or an empty one if no state file exists yet.
    pub fn load(&self) -> StorageResult<State> {
        let path = self.path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No state file at {}, starting empty", path.display());
                return Ok(State::default());
            }
            Err(e) => return Err(StorageError::io(path, e)),
        };

        debug!("Loading state from {}", path.display());
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persist the record with an atomic temp-file rename.
    pub fn save(&self, state: &State) -> StorageResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| StorageError::io(&self.root, e))?;

        let mut state = state.clone();
        if state.version == 0 {
            state.version = STATE_VERSION;
        }

        let final_file = self.path();
        let temp_file = self.root.join(format!("{STATE_FILE}.tmp"));

        let json = serde_json::to_string_pretty(&state)?;
        fs::write(&temp_file, json).map_err(|e| StorageError::io(&temp_file, e))?;
        fs::rename(&temp_file, &final_file).map_err(|e| StorageError::io(&final_file, e))?;

        debug!("Saved state to {}", final_file.display());
        Ok(())
    }
}
