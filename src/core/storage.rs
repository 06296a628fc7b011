//! # Local Storage
//!
//! Small JSON documents under `~/.twin/`:
//!
//! ```text
//! ~/.twin/
//! ├── config.toml     (see config.rs)
//! ├── checkins.json   CheckInLog
//! ├── avatar.json     AvatarConfig
//! └── auth.json       AuthSession (tokens + cached user profile)
//! ```
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`).
//! A missing file loads as the type's default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::avatar::AvatarConfig;
use crate::core::checkin::CheckInLog;

const CHECKINS_FILE: &str = "checkins.json";
const AVATAR_FILE: &str = "avatar.json";
const AUTH_FILE: &str = "auth.json";

/// Returns `~/.twin/`, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".twin");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
pub fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read JSON from `path`, or `T::default()` if the file does not exist.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> io::Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// The set of documents in one data directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store rooted at `~/.twin/`.
    pub fn open_default() -> io::Result<Self> {
        data_dir().map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn auth_path(&self) -> PathBuf {
        self.dir.join(AUTH_FILE)
    }

    pub fn load_checkins(&self) -> io::Result<CheckInLog> {
        read_json_or_default(&self.dir.join(CHECKINS_FILE))
    }

    pub fn save_checkins(&self, log: &CheckInLog) -> io::Result<()> {
        atomic_write_json(&self.dir.join(CHECKINS_FILE), log)?;
        debug!("Saved {} check-ins", log.entries.len());
        Ok(())
    }

    /// Saved avatar, or `None` if the user never saved one.
    pub fn load_avatar(&self) -> io::Result<Option<AvatarConfig>> {
        read_json_or_default(&self.dir.join(AVATAR_FILE))
    }

    pub fn save_avatar(&self, avatar: &AvatarConfig) -> io::Result<()> {
        atomic_write_json(&self.dir.join(AVATAR_FILE), avatar)?;
        debug!("Saved avatar: {}", avatar.describe());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::avatar::{AvatarField, HairColor};
    use crate::core::checkin::CheckIn;
    use crate::core::mood::Mood;
    use chrono::NaiveDate;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_missing_files_load_as_defaults() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load_checkins().unwrap(), CheckInLog::default());
        assert_eq!(store.load_avatar().unwrap(), None);
    }

    #[test]
    fn test_checkins_persist() {
        let (_dir, store) = temp_store();
        let mut log = CheckInLog::default();
        log.record(CheckIn {
            mood: Mood::Relaxed,
            intensity: 4,
            note: Some("beach day".into()),
            date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        })
        .unwrap();

        store.save_checkins(&log).unwrap();
        assert_eq!(store.load_checkins().unwrap(), log);
    }

    #[test]
    fn test_avatar_persists() {
        let (_dir, store) = temp_store();
        let mut avatar = AvatarConfig::default();
        avatar.set(AvatarField::HairColor, "red").unwrap();

        store.save_avatar(&avatar).unwrap();
        let loaded = store.load_avatar().unwrap().unwrap();
        assert_eq!(loaded.hair_color, HairColor::Red);
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp_file() {
        let (dir, store) = temp_store();
        store.save_checkins(&CheckInLog::default()).unwrap();
        assert!(dir.path().join("checkins.json").exists());
        assert!(!dir.path().join("checkins.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_invalid_data() {
        let (dir, store) = temp_store();
        fs::write(dir.path().join("checkins.json"), "{not json").unwrap();
        let err = store.load_checkins().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
