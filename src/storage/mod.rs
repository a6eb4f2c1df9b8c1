pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::errors::AppResult;

/// String slots that outlive a single client process when backed by disk.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}
