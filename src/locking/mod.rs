//! Station locking for concurrent runs over a shared output tree.

mod file_lock;

pub use file_lock::{LockInfo, StationLock, cleanup_all_locks};
