use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use crate::{
    errors::{AppError, AppResult},
    storage::KeyValueStorage,
};

/// Slots kept in memory and mirrored to a single JSON object on disk after
/// every write, so a new process picks up where the last one stopped.
pub struct FileStorage {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let slots = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    AppError::Storage(format!("corrupt session file {}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        log::debug!("Opened session file {} ({} slots)", path.display(), slots.len());
        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn slots(&self) -> AppResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| AppError::Storage("file storage lock poisoned".to_string()))
    }

    fn persist(&self, slots: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body =
            serde_json::to_vec_pretty(slots).map_err(|e| AppError::Storage(e.to_string()))?;
        // Write-then-rename: readers see either the old file or the new one.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut slots = self.slots()?;
        slots.insert(key.to_string(), value.to_string());
        self.persist(&slots)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut slots = self.slots()?;
        if slots.remove(key).is_some() {
            self.persist(&slots)?;
        }
        Ok(())
    }
}
