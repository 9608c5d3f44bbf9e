//! Reusable scratch buffers for missing-set computation.
//!
//! Most synchronizations miss only a handful of assets. Rather than allocating
//! a fresh array for every call, the engine leases a fixed-capacity buffer
//! from a [`ChecksumPool`] and hands it back when done.
//!
//! A [`ScratchBuffer`] never refuses a push. When it runs out of room it swaps
//! itself for an array of twice the capacity, copying what it has collected so
//! far. The original pooled array goes back to the pool at that point; the
//! grown replacement is dropped on release so the pool never retains
//! oversized memory.

use core::fmt;
use core::mem;
use core::ops::Deref;
use core::sync::atomic::{AtomicUsize, Ordering};

use assetsync_primitives::checksum::Checksum;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::{SyncConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_POOL_SIZE};

/// Bounded pool of fixed-capacity checksum buffers.
///
/// Safe to share between concurrent synchronizations; lease and return only
/// take a short, uncontended lock on the free list.
pub struct ChecksumPool {
    free: Mutex<Vec<Vec<Checksum>>>,
    max_retained: usize,
    buffer_capacity: usize,
    leased: AtomicUsize,
    returned: AtomicUsize,
    dedicated: AtomicUsize,
}

/// Point-in-time counters of a [`ChecksumPool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Pooled buffers handed out
    pub leased: usize,
    /// Pooled buffers handed back
    pub returned: usize,
    /// One-off arrays allocated outside the pool, including grown buffers
    pub dedicated: usize,
    /// Buffers currently idle in the pool
    pub available: usize,
}

impl ChecksumPool {
    #[must_use]
    pub fn new(max_retained: usize, buffer_capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_retained)),
            max_retained,
            buffer_capacity,
            leased: AtomicUsize::new(0),
            returned: AtomicUsize::new(0),
            dedicated: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.pool_size, config.buffer_capacity)
    }

    #[must_use]
    pub const fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Picks a buffer for an expected number of entries: a pooled one when it
    /// fits, otherwise a dedicated array of exactly `expected` entries.
    pub fn scratch(&self, expected: usize) -> ScratchBuffer<'_> {
        if expected <= self.buffer_capacity {
            self.lease()
        } else {
            self.dedicated(expected)
        }
    }

    /// Leases a pooled buffer with [`Self::buffer_capacity`] slots.
    pub fn lease(&self) -> ScratchBuffer<'_> {
        let storage = self
            .free
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.buffer_capacity));

        let _previous = self.leased.fetch_add(1, Ordering::Relaxed);

        ScratchBuffer {
            pool: self,
            storage,
            capacity: self.buffer_capacity,
            pooled: true,
        }
    }

    /// Allocates a one-off buffer that is never returned to the pool.
    pub fn dedicated(&self, capacity: usize) -> ScratchBuffer<'_> {
        let _previous = self.dedicated.fetch_add(1, Ordering::Relaxed);

        ScratchBuffer {
            pool: self,
            storage: Vec::with_capacity(capacity),
            capacity,
            pooled: false,
        }
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            leased: self.leased.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            dedicated: self.dedicated.load(Ordering::Relaxed),
            available: self.free.lock().len(),
        }
    }

    fn give_back(&self, mut storage: Vec<Checksum>) {
        storage.clear();

        let _previous = self.returned.fetch_add(1, Ordering::Relaxed);

        let mut free = self.free.lock();

        if free.len() < self.max_retained {
            free.push(storage);
        }
    }
}

impl Default for ChecksumPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE, DEFAULT_BUFFER_CAPACITY)
    }
}

impl fmt::Debug for ChecksumPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumPool")
            .field("max_retained", &self.max_retained)
            .field("buffer_capacity", &self.buffer_capacity)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Growable list of checksums leased from a [`ChecksumPool`].
///
/// Released on drop: a still-pooled buffer returns to its pool, anything else
/// is freed.
pub struct ScratchBuffer<'pool> {
    pool: &'pool ChecksumPool,
    storage: Vec<Checksum>,
    capacity: usize,
    pooled: bool,
}

impl ScratchBuffer<'_> {
    pub fn push(&mut self, checksum: Checksum) {
        if self.storage.len() == self.capacity {
            self.grow();
        }

        self.storage.push(checksum);
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether this is still the array originally leased from the pool.
    #[must_use]
    pub const fn is_pooled(&self) -> bool {
        self.pooled
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Checksum] {
        &self.storage
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity.saturating_mul(2).max(1);

        let mut grown = Vec::with_capacity(new_capacity);
        grown.extend_from_slice(&self.storage);

        let _previous = self.pool.dedicated.fetch_add(1, Ordering::Relaxed);

        let outgrown = mem::replace(&mut self.storage, grown);

        if mem::replace(&mut self.pooled, false) {
            self.pool.give_back(outgrown);
        }

        debug!(
            old_capacity = self.capacity,
            new_capacity, "Scratch buffer outgrew its capacity"
        );

        self.capacity = new_capacity;
    }
}

impl Deref for ScratchBuffer<'_> {
    type Target = [Checksum];

    fn deref(&self) -> &Self::Target {
        &self.storage
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        if self.pooled {
            self.pool.give_back(mem::take(&mut self.storage));
        }
    }
}

impl fmt::Debug for ScratchBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field("len", &self.storage.len())
            .field("capacity", &self.capacity)
            .field("pooled", &self.pooled)
            .finish()
    }
}
