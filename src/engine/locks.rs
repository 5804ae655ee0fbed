use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// One mutex per path, created on first use and kept for the registry's
/// lifetime.
#[derive(Debug, Default)]
pub(crate) struct LockRegistry {
    locks: Mutex<FxHashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(path.to_path_buf()).or_default().clone()
    }
}
