//! LRU cache for kernel matrix values
//!
//! The SMO inner loop evaluates the same kernel entries repeatedly. The
//! matrix is symmetric, so entries are keyed with i <= j.

use lru::LruCache;
use std::num::NonZeroUsize;

/// LRU cache over symmetric kernel matrix entries
pub struct KernelCache {
    cache: LruCache<(usize, usize), f64>,
}

impl KernelCache {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Create a cache sized from a memory budget in bytes
    ///
    /// Assumes 16 bytes per entry (key pair + value).
    pub fn with_memory_limit(memory_bytes: usize) -> Self {
        Self::new(memory_bytes / 16)
    }

    pub fn get(&mut self, i: usize, j: usize) -> Option<f64> {
        self.cache.get(&Self::key(i, j)).copied()
    }

    pub fn put(&mut self, i: usize, j: usize, value: f64) {
        self.cache.put(Self::key(i, j), value);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn key(i: usize, j: usize) -> (usize, usize) {
        if i <= j {
            (i, j)
        } else {
            (j, i)
        }
    }
}
