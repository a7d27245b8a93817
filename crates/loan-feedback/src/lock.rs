//! Advisory locking on a sidecar `<log>.lock` file.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{FeedbackError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LockMode {
    Shared,
    Exclusive,
}

/// Holds the lock until dropped.
#[derive(Debug)]
pub(crate) struct LogLock {
    file: File,
}

/// Path of the sidecar lock file for `log`.
pub(crate) fn lock_path(log: &Path) -> PathBuf {
    sibling_with_suffix(log, ".lock")
}

/// `log` with `suffix` appended to its file name.
pub(crate) fn sibling_with_suffix(log: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = log.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

impl LogLock {
    /// Blocks until the lock on `log`'s sidecar is held in `mode`.
    pub(crate) fn acquire(log: &Path, mode: LockMode) -> Result<Self> {
        let path = lock_path(log);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| FeedbackError::Lock {
                path: path.clone(),
                source,
            })?;
        let locked = match mode {
            LockMode::Shared => file.lock_shared(),
            LockMode::Exclusive => file.lock(),
        };
        locked.map_err(|source| FeedbackError::Lock { path, source })?;
        Ok(Self { file })
    }
}

impl Drop for LogLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock as well.
        let _ = self.file.unlock();
    }
}
