use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use crate::{
    errors::{AppError, AppResult},
    storage::KeyValueStorage,
};

#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> AppResult<MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| AppError::Storage("memory storage lock poisoned".to_string()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.slots()?.remove(key);
        Ok(())
    }
}
