//! Scoped exclusive locking for manifest documents
//!
//! The registration pipeline assumes single-writer access for the duration
//! of one run. [`DocumentLock`] is the invocation layer's tool for that:
//! an advisory exclusive lock held for the lifetime of the guard and
//! released on every exit path, including panics, via `Drop`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// An exclusive advisory lock on a manifest document.
///
/// The lock is taken on a `<name>.lock` sibling rather than the document
/// itself, so the document can still be renamed over during an atomic
/// commit while the lock is held.
#[derive(Debug)]
pub struct DocumentLock {
    file: std::fs::File,
    lock_path: PathBuf,
}

impl DocumentLock {
    /// Acquire an exclusive lock, blocking until it is available.
    pub fn acquire(document: &Path) -> Result<Self> {
        let lock_path = Self::lock_path_for(document);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| Error::io(&lock_path, e))?;

        file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: document.to_path_buf(),
        })?;

        tracing::debug!(path = %document.display(), "acquired document lock");

        Ok(Self { file, lock_path })
    }

    /// Acquire the lock without blocking; fails if another holder exists.
    pub fn try_acquire(document: &Path) -> Result<Self> {
        let lock_path = Self::lock_path_for(document);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| Error::io(&lock_path, e))?;

        file.try_lock_exclusive().map_err(|_| Error::LockFailed {
            path: document.to_path_buf(),
        })?;

        Ok(Self { file, lock_path })
    }

    /// Path of the sidecar lock file.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    fn lock_path_for(document: &Path) -> PathBuf {
        let name = document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        document.with_file_name(format!("{name}.lock"))
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        // Release failures at drop time are unactionable.
        let _ = FileExt::unlock(&self.file);
    }
}
