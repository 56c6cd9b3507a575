//! In-memory list cache keyed by entity kind.

use crate::config::{CacheConfig, EntityKind};
use crate::model::Record;
use mini_moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Hit/miss counters since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

/// Cache of full record lists, one slot per [`EntityKind`].
///
/// Each kind has a generation bumped by every invalidation. A list read from
/// the store is only cached if no invalidation happened since the reader
/// took its generation, so a slow read cannot resurrect a stale list.
pub struct ListCache {
    /// In-memory cache with TTL.
    lists: Cache<EntityKind, Arc<Vec<Record>>>,
    /// Held while checking and inserting, and while invalidating.
    generations: Mutex<HashMap<EntityKind, u64>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl ListCache {
    /// Create a new list cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            lists: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(CacheConfig::MAX_ENTRIES)
                .build(),
            generations: Mutex::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the cached list for a kind.
    pub fn get(&self, kind: EntityKind) -> Option<Arc<Vec<Record>>> {
        match self.lists.get(&kind) {
            Some(records) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("List cache hit for {}", kind.cache_tag());
                Some(records)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("List cache miss for {}", kind.cache_tag());
                None
            }
        }
    }

    fn lock_generations(&self) -> MutexGuard<'_, HashMap<EntityKind, u64>> {
        // The map holds plain counters; a panic elsewhere cannot leave it torn
        self.generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current generation of a kind. Read it before loading from the store.
    pub fn generation(&self, kind: EntityKind) -> u64 {
        self.lock_generations().get(&kind).copied().unwrap_or(0)
    }

    /// Store the list for a kind, loaded while `generation` was current.
    ///
    /// Returns `false` and caches nothing if the kind was invalidated since.
    pub fn put(&self, kind: EntityKind, generation: u64, records: Arc<Vec<Record>>) -> bool {
        let generations = self.lock_generations();
        if generations.get(&kind).copied().unwrap_or(0) != generation {
            debug!("Discarded stale list for {}", kind.cache_tag());
            return false;
        }
        self.lists.insert(kind, records);
        true
    }

    /// Drop the cached list for one kind.
    pub fn invalidate(&self, kind: EntityKind) {
        let mut generations = self.lock_generations();
        *generations.entry(kind).or_insert(0) += 1;
        self.lists.invalidate(&kind);
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!("Invalidated list cache tag {}", kind.cache_tag());
    }

    /// Drop every cached list.
    pub fn invalidate_all(&self) {
        let mut generations = self.lock_generations();
        for kind in EntityKind::all() {
            *generations.entry(kind).or_insert(0) += 1;
        }
        self.lists.invalidate_all();
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new(CacheConfig::LIST_TTL)
    }
}
