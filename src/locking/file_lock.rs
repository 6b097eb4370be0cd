//! Per-station lock files so concurrent runs never extract the same station twice.

use crate::catalog::StationKey;
use crate::constants::{LOCK_FILE_EXTENSION, LOCK_WRITE_GRACE};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Lock file content for debugging.
#[derive(Debug, Serialize, Deserialize)]
pub struct LockInfo {
    /// Process ID that holds the lock.
    pub pid: u32,
    /// Hostname of the machine.
    pub hostname: String,
    /// When the lock was acquired.
    pub started: DateTime<Utc>,
    /// Station key being extracted.
    pub station: String,
}

impl LockInfo {
    fn for_current_process(key: &StationKey) -> Self {
        Self {
            pid: std::process::id(),
            hostname: current_hostname(),
            started: Utc::now(),
            station: key.to_string(),
        }
    }

    /// Read the holder recorded in a lock file.
    pub fn read(lock_path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(lock_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Whether the holder ran on this host and has since exited.
    pub fn holder_is_gone(&self) -> bool {
        self.hostname == current_hostname() && !process_alive(self.pid)
    }
}

fn current_hostname() -> String {
    hostname::get().map_or_else(
        |_| "unknown".to_string(),
        |h| h.to_string_lossy().into_owned(),
    )
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// Without /proc a holder can only be aged out.
#[cfg(not(target_os = "linux"))]
const fn process_alive(_pid: u32) -> bool {
    true
}

/// RAII guard for one station of one event.
#[derive(Debug)]
pub struct StationLock {
    lock_path: PathBuf,
}

impl StationLock {
    /// Acquire the lock for `key` inside the event sub-folder, creating the folder.
    pub fn acquire(event_dir: &Path, key: &StationKey) -> Result<Self> {
        fs::create_dir_all(event_dir).map_err(|e| Error::OutputDirCreateFailed {
            path: event_dir.to_path_buf(),
            source: e,
        })?;

        let lock_path = Self::lock_path_for(event_dir, key);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path);

        match file {
            Ok(mut f) => {
                let info = LockInfo::for_current_process(key);

                let json = serde_json::to_string_pretty(&info).unwrap_or_else(|_| "{}".to_string());
                let _ = f.write_all(json.as_bytes());

                ACTIVE_LOCKS.register(&lock_path);

                Ok(Self { lock_path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(Error::StationLocked { path: lock_path })
            }
            Err(e) => Err(Error::LockCreate {
                path: lock_path,
                source: e,
            }),
        }
    }

    /// Lock file path for a station: `<event_dir>/NET.STA.C.seistrim.lock`.
    pub fn lock_path_for(event_dir: &Path, key: &StationKey) -> PathBuf {
        event_dir.join(format!("{key}{LOCK_FILE_EXTENSION}"))
    }

    /// Whether another process currently holds the station.
    pub fn is_locked(event_dir: &Path, key: &StationKey) -> bool {
        Self::lock_path_for(event_dir, key).exists()
    }

    /// Whether an existing lock was left behind by a holder that is gone.
    ///
    /// Locks held by this process are never stale. Otherwise a lock is stale when it
    /// is older than `max_age`, when its recorded holder ran on this host and has
    /// exited, or when it still has no readable holder after [`LOCK_WRITE_GRACE`].
    pub fn is_stale(event_dir: &Path, key: &StationKey, max_age: Option<Duration>) -> bool {
        let lock_path = Self::lock_path_for(event_dir, key);
        if ACTIVE_LOCKS.contains(&lock_path) {
            return false;
        }
        let Ok(metadata) = fs::metadata(&lock_path) else {
            return false;
        };

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .unwrap_or_default();
        if max_age.is_some_and(|max| age >= max) {
            return true;
        }

        LockInfo::read(&lock_path).map_or(age >= LOCK_WRITE_GRACE, |info| info.holder_is_gone())
    }

    /// Remove a stale lock. A lock that is already gone counts as removed.
    pub fn remove_stale(event_dir: &Path, key: &StationKey) -> Result<()> {
        let lock_path = Self::lock_path_for(event_dir, key);
        match fs::remove_file(&lock_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::LockRemove {
                path: lock_path,
                source: e,
            }),
        }
    }
}

impl Drop for StationLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        ACTIVE_LOCKS.unregister(&self.lock_path);
    }
}

/// Lock paths held by this process.
#[derive(Debug, Default)]
struct LockRegistry(Mutex<Vec<PathBuf>>);

impl LockRegistry {
    const fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    fn register(&self, path: &Path) {
        if let Ok(mut locks) = self.0.lock() {
            locks.push(path.to_path_buf());
        }
    }

    fn unregister(&self, path: &Path) {
        if let Ok(mut locks) = self.0.lock() {
            locks.retain(|p| p != path);
        }
    }

    fn contains(&self, path: &Path) -> bool {
        self.0.lock().is_ok_and(|locks| locks.iter().any(|p| p == path))
    }

    fn remove_all(&self) {
        if let Ok(locks) = self.0.lock() {
            for lock_path in locks.iter() {
                let _ = fs::remove_file(lock_path);
            }
        }
    }
}

/// Global registry of active lock paths for cleanup on signal.
static ACTIVE_LOCKS: LockRegistry = LockRegistry::new();

/// Remove every lock file this process holds. Called from the Ctrl+C and SIGTERM
/// handler.
pub fn cleanup_all_locks() {
    ACTIVE_LOCKS.remove_all();
}
