//! Operator state persisted between hook invocations
//!
//! State is loaded before an event is handled and saved after it, so each
//! invocation is a pure function of (stored state, config, event).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::relation::DatabaseRelationStore;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharmState {
    #[serde(default)]
    pub database: DatabaseRelationStore,
}

pub trait StateStore {
    fn load(&self) -> Result<CharmState>;
    fn save(&self, state: &CharmState) -> Result<()>;
}

/// JSON file backed state. A missing file means a fresh unit.
#[derive(Clone, Debug)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<CharmState> {
        if !self.path.exists() {
            debug!("No stored state at {}, starting fresh", self.path.display());
            return Ok(CharmState::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::StateError(format!("corrupt state file {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, state: &CharmState) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{DatabaseCredentials, DatabaseType};

    #[test]
    fn test_missing_file_loads_default_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));
        assert_eq!(store.load().unwrap(), CharmState::default());
    }

    #[test]
    fn test_state_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));
        let state = CharmState {
            database: DatabaseRelationStore::with_credentials(DatabaseCredentials {
                kind: DatabaseType::Postgres,
                host: "db:5432".to_string(),
                name: "nextcloud".to_string(),
                user: "nc".to_string(),
                password: "pw".to_string(),
            }),
        };

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
        assert!(!dir.path().join("state.tmp").exists());
    }

    #[test]
    fn test_corrupt_state_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStateStore::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::StateError(_)));
    }
}
