//! Whole-state snapshot persistence
//!
//! The entire application state is one pretty-printed JSON document at a
//! fixed path under the data directory. Saves always rewrite the whole
//! file; there is no partial update. Backup files written by `export_state`
//! use the identical shape, so a backup can be re-imported as-is, including
//! backups made by the original web app.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::warn;
use serde_json::Value;
use stepmeter_types::{AppState, Error, Result};

/// Snapshot file name under the data directory
const STATE_FILE: &str = "state.json";

/// Owns the snapshot path and the load/save/reset lifecycle
pub struct StateStore {
    state_path: PathBuf,
}

impl StateStore {
    /// Anchor the store in `data_dir`, creating the directory when missing.
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            state_path: data_dir.join(STATE_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.state_path
    }

    /// Load the snapshot, or default state when none exists. A snapshot
    /// that no longer parses is treated as absent rather than fatal.
    pub fn load(&self) -> Result<AppState> {
        if !self.state_path.exists() {
            return Ok(AppState::default());
        }
        let file = File::open(&self.state_path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader).unwrap_or_else(|e| {
            warn!(
                "unreadable snapshot {}: {}; starting from a fresh state",
                self.state_path.display(),
                e
            );
            AppState::default()
        }))
    }

    /// Replace the snapshot with the whole current state.
    pub fn save(&self, state: &AppState) -> Result<()> {
        let file = File::create(&self.state_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, state)?;
        Ok(())
    }

    /// Delete the snapshot entirely.
    pub fn reset(&self) -> Result<()> {
        if self.state_path.exists() {
            fs::remove_file(&self.state_path)?;
        }
        Ok(())
    }
}

/// Write a backup file carrying the exact snapshot shape.
pub fn export_state(state: &AppState, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, state)?;
    Ok(())
}

/// Read a backup file into a full state.
///
/// The only structural requirement is a defined `onboarded` field; every
/// other missing field falls back to its default, matching how tolerant the
/// original app was about its own backups.
pub fn import_state(path: &Path) -> Result<AppState> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    if value.get("onboarded").is_none() {
        return Err(Error::InvalidBackupFormat);
    }
    serde_json::from_value(value).map_err(|_| Error::InvalidBackupFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stepmeter_types::Reading;
    use tempfile::tempdir;

    fn populated_state() -> AppState {
        AppState {
            onboarded: true,
            api_key: "secret".to_string(),
            allowed_steps: 500.0,
            season_limit: 12845.0,
            initial_photo: Some("aGVsbG8=".to_string()),
            readings: vec![
                Reading {
                    date: Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap(),
                    value: 12345.0,
                    consumption: 0.0,
                },
                Reading {
                    date: Utc.with_ymd_and_hms(2026, 6, 3, 10, 0, 0).unwrap(),
                    value: 12370.5,
                    consumption: 25.5,
                },
            ],
        }
    }

    #[test]
    fn load_without_snapshot_gives_default_state() {
        let dir = tempdir().unwrap();
        let store = StateStore::open(dir.path().to_path_buf()).unwrap();

        let state = store.load().unwrap();
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn save_then_load_round_trips_exactly() {
        let dir = tempdir().unwrap();
        let store = StateStore::open(dir.path().to_path_buf()).unwrap();

        let state = populated_state();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let store = StateStore::open(dir.path().to_path_buf()).unwrap();
        fs::write(store.path(), "{ this is not json").unwrap();

        let state = store.load().unwrap();
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn reset_removes_the_snapshot() {
        let dir = tempdir().unwrap();
        let store = StateStore::open(dir.path().to_path_buf()).unwrap();

        store.save(&populated_state()).unwrap();
        assert!(store.path().exists());

        store.reset().unwrap();
        assert!(!store.path().exists());
        // resetting twice is fine
        store.reset().unwrap();
    }

    #[test]
    fn export_then_import_round_trips_exactly() {
        let dir = tempdir().unwrap();
        let backup = dir.path().join("backup.json");

        let state = populated_state();
        export_state(&state, &backup).unwrap();
        assert_eq!(import_state(&backup).unwrap(), state);
    }

    #[test]
    fn import_rejects_files_without_onboarded() {
        let dir = tempdir().unwrap();
        let backup = dir.path().join("backup.json");
        fs::write(&backup, r#"{"readings": [], "allowedSteps": 500}"#).unwrap();

        match import_state(&backup) {
            Err(Error::InvalidBackupFormat) => {}
            other => panic!("expected InvalidBackupFormat, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn import_accepts_minimal_original_backups() {
        let dir = tempdir().unwrap();
        let backup = dir.path().join("backup.json");
        fs::write(&backup, r#"{"onboarded": true, "apiKey": "k"}"#).unwrap();

        let state = import_state(&backup).unwrap();
        assert!(state.onboarded);
        assert_eq!(state.api_key, "k");
        assert!(state.readings.is_empty());
    }

    #[test]
    fn import_propagates_unparseable_json() {
        let dir = tempdir().unwrap();
        let backup = dir.path().join("backup.json");
        fs::write(&backup, "not json at all").unwrap();

        match import_state(&backup) {
            Err(Error::Json(_)) => {}
            other => panic!("expected Json error, got {:?}", other.map(|_| ())),
        }
    }
}
