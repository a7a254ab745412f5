//! Lock manager for per-record locks
//!
//! Hands out one mutex per record key. Entries are created lazily on first
//! use and discarded when the record goes away. The map's shard locks are
//! only held while an entry is inserted, cloned or removed, never while a
//! record lock is held.

use dashmap::DashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Handle to the mutex guarding one record
///
/// Holding the handle keeps the mutex alive even after the manager has
/// discarded its entry.
#[derive(Clone, Default)]
pub struct RecordLock {
    inner: Arc<Mutex<()>>,
}

impl RecordLock {
    /// Block until the record lock is held
    ///
    /// The mutex guards no data, so a poisoned lock is simply taken over.
    pub fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RecordLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordLock")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

/// Lock manager keyed by record id
#[derive(Debug)]
pub struct RecordLockManager<K>
where
    K: Eq + Hash,
{
    locks: DashMap<K, RecordLock>,
}

impl<K> RecordLockManager<K>
where
    K: Eq + Hash + Copy + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the lock for `key`, creating it on first use
    pub fn lock_for(&self, key: K) -> RecordLock {
        self.locks
            .entry(key)
            .or_insert_with(|| {
                trace!(key = ?key, "Creating record lock");
                RecordLock::default()
            })
            .clone()
    }

    /// Discard the lock for `key`; returns whether one existed
    pub fn release(&self, key: &K) -> bool {
        let removed = self.locks.remove(key).is_some();
        if removed {
            trace!(key = ?key, "Released record lock");
        }
        removed
    }

    /// Number of live lock entries
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl<K> Default for RecordLockManager<K>
where
    K: Eq + Hash + Copy + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
