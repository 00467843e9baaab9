//! Process lock file
//!
//! Keeps two ferry runs from pushing the same files at once. The lock is an
//! exclusive advisory lock (`flock`/`LockFileEx`) on a file holding our pid.
//! The file is removed when the guard drops, and on SIGINT/SIGTERM once
//! [`install_interrupt_cleanup`] has been called.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::{FerryError, FerryResult};

/// Exit status used after an interrupt
const INTERRUPTED_EXIT: i32 = 130;

/// State of a lock file as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No lock file exists
    Missing,
    /// A lock file exists but nobody holds it (stale)
    Unlocked,
    /// A live process holds the lock
    Locked,
}

/// Held lock; released and removed on drop
#[derive(Debug)]
pub struct ProcessLock {
    path: PathBuf,
    file: Option<File>,
}

impl ProcessLock {
    /// Take the lock at `path`, failing with `Locked` if another holder exists.
    pub fn acquire(path: impl Into<PathBuf>) -> FerryResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| lock_error(&path, e))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| lock_error(&path, e))?;

        if let Err(e) = file.try_lock_exclusive() {
            if is_contended(&e) {
                return Err(FerryError::Locked { path });
            }
            return Err(lock_error(&path, e));
        }

        // Only the holder rewrites the pid.
        file.set_len(0).map_err(|e| lock_error(&path, e))?;
        write!(file, "{}", std::process::id()).map_err(|e| lock_error(&path, e))?;
        file.flush().map_err(|e| lock_error(&path, e))?;
        debug!(path = %path.display(), "lock acquired");

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "cannot remove lock file");
            }
        }
        if let Some(file) = self.file.take() {
            let _ = FileExt::unlock(&file);
        }
    }
}

/// Inspect a lock file without keeping it.
pub fn probe(path: &Path) -> FerryResult<LockState> {
    let file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LockState::Missing),
        Err(e) => return Err(lock_error(path, e)),
    };
    match file.try_lock_exclusive() {
        Ok(()) => {
            let _ = FileExt::unlock(&file);
            Ok(LockState::Unlocked)
        }
        Err(e) if is_contended(&e) => Ok(LockState::Locked),
        Err(e) => Err(lock_error(path, e)),
    }
}

/// Remove `path` and exit when the process is interrupted or terminated.
///
/// Only one handler can be installed per process.
pub fn install_interrupt_cleanup(path: &Path) -> FerryResult<()> {
    let owned = path.to_path_buf();
    ctrlc::set_handler(move || {
        let _ = fs::remove_file(&owned);
        std::process::exit(INTERRUPTED_EXIT);
    })
    .map_err(|e| FerryError::Lock {
        path: path.to_path_buf(),
        message: format!("cannot install interrupt handler: {e}"),
    })
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == fs2::lock_contended_error().kind()
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn lock_error(path: &Path, e: io::Error) -> FerryError {
    FerryError::Lock {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn acquire_writes_pid_and_drop_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run/ferry.pid");
        {
            let lock = ProcessLock::acquire(&path).unwrap();
            assert_eq!(lock.path(), path.as_path());
            let content = fs::read_to_string(&path).unwrap();
            assert_eq!(content, std::process::id().to_string());
        }
        assert!(!path.exists());
    }

    #[test]
    fn second_acquire_is_refused_while_held() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ferry.pid");
        let _held = ProcessLock::acquire(&path).unwrap();
        let err = ProcessLock::acquire(&path).unwrap_err();
        assert!(matches!(err, FerryError::Locked { .. }), "{err}");
    }

    #[test]
    fn probe_reports_each_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ferry.pid");
        assert_eq!(probe(&path).unwrap(), LockState::Missing);

        let held = ProcessLock::acquire(&path).unwrap();
        assert_eq!(probe(&path).unwrap(), LockState::Locked);
        drop(held);

        fs::write(&path, "12345").unwrap();
        assert_eq!(probe(&path).unwrap(), LockState::Unlocked);
    }

    #[test]
    fn stale_lock_file_can_be_taken_over() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ferry.pid");
        fs::write(&path, "999999999").unwrap();
        let _lock = ProcessLock::acquire(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            std::process::id().to_string()
        );
    }
}
