use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lazily populated table of per-collection write locks.
///
/// The table itself sits behind one mutex that is held only long enough to
/// look up or insert an entry, never across I/O. Each key gets exactly one
/// lock for the lifetime of the table. Stores key the table with
/// [`lock_key`], so a nested collection shares the lock of its top-level
/// collection.
#[derive(Default)]
pub struct LockTable {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockTable {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the lock for `collection`, creating it on first access.
    pub fn get_or_create(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(collection) {
            return Arc::clone(lock);
        }
        let lock = Arc::new(Mutex::new(()));
        locks.insert(collection.to_string(), Arc::clone(&lock));
        lock
    }

    /// Return the lock guarding writes to `collection` and to every
    /// collection nested under the same top-level directory.
    pub fn for_collection(&self, collection: &str) -> Arc<Mutex<()>> {
        self.get_or_create(lock_key(collection))
    }

    /// Number of collections that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if no collection has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Table key for `collection`: its first path segment.
///
/// Deleting `("users", "archive")` removes `users/archive` and everything
/// below it, so writers to any of those must wait on the same lock.
pub fn lock_key(collection: &str) -> &str {
    collection.split_once('/').map_or(collection, |(top, _)| top)
}

/// Block until `lock` is held.
///
/// The mutex guards no data, so a panic in a previous holder leaves nothing
/// inconsistent and poisoning is ignored.
pub(crate) fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

impl std::fmt::Debug for LockTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockTable")
            .field("collections", &self.len())
            .finish()
    }
}
