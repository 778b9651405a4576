// Author: Dustin Pilgrim
// License: MIT
//
// At most one background refresh at a time across overlapping invocations.
// The guard is an advisory lock on a file next to the images. The file itself
// stays around; only the lock matters, and the kernel drops it when the
// holding process exits, killed or not.

use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

const GUARD_FILE: &str = "refresh.lock";

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("refresh already running (guard held at {})", .0.display())]
    AlreadyRunning(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct RefreshGuard {
    file: File,
}

impl RefreshGuard {
    pub fn acquire(dir: &Path) -> Result<Self, GuardError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(GUARD_FILE);

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => return Err(GuardError::AlreadyRunning(path)),
            Err(TryLockError::Error(e)) => return Err(GuardError::Io(e)),
        }

        // Holder pid, for whoever inspects the file by hand.
        file.set_len(0)?;
        writeln!(file, "pid={}", std::process::id())?;

        Ok(Self { file })
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_until_drop() {
        let dir = tempfile::tempdir().unwrap();

        let first = RefreshGuard::acquire(dir.path()).unwrap();
        assert!(matches!(
            RefreshGuard::acquire(dir.path()),
            Err(GuardError::AlreadyRunning(_))
        ));

        drop(first);
        RefreshGuard::acquire(dir.path()).unwrap();
    }

    #[test]
    fn leftover_guard_file_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        // Left behind by a refresh that was killed; nobody holds the lock.
        fs::write(dir.path().join(GUARD_FILE), "pid=1\n").unwrap();

        let _guard = RefreshGuard::acquire(dir.path()).unwrap();
        let content = fs::read_to_string(dir.path().join(GUARD_FILE)).unwrap();
        assert_eq!(content.trim(), format!("pid={}", std::process::id()));
    }

    #[test]
    fn unreadable_leftover_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(GUARD_FILE), "garbage").unwrap();

        RefreshGuard::acquire(dir.path()).unwrap();
    }

    #[test]
    fn guard_file_survives_release() {
        let dir = tempfile::tempdir().unwrap();
        drop(RefreshGuard::acquire(dir.path()).unwrap());

        assert!(dir.path().join(GUARD_FILE).exists());
        RefreshGuard::acquire(dir.path()).unwrap();
    }
}
