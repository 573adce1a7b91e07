//! The worker-private path cache.
//!
//! Agents re-request the same commute constantly (home to work, depot to shop), so the
//! worker keeps recent results keyed by `(actor class, start, end)`. The cache is owned
//! by the worker thread and never shared, so it needs no synchronization. Entries age
//! out on a TTL checked lazily at lookup time, and when the cache is full the least-used
//! entry (oldest insertion on a tie) makes room.

use crate::{grid::ActorClass, path::WorldPath, Point};
use hashbrown::HashMap;
use log::trace;
use std::time::{Duration, Instant};

/// Cache key: the actor class picks the grid, start/end the route.
pub type CacheKey = (ActorClass, Point, Point);

/// Capacity and expiry settings of the [`PathCache`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of entries before eviction kicks in.
    pub capacity: usize,
    /// Entries older than this are treated as absent and dropped on lookup.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> CacheConfig {
        CacheConfig {
            capacity: 512,
            ttl: Duration::from_secs(30),
        }
    }
}

/// Hit/miss/eviction counters, readable over the worker boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that missed (including TTL expiries).
    pub misses: u64,
    /// Entries stored over the cache's lifetime.
    pub stored: u64,
    /// Entries evicted to make room.
    pub evictions: u64,
    /// Entries currently held.
    pub occupancy: usize,
}

#[derive(Clone, Debug)]
struct CacheEntry {
    grid_path: Vec<Point>,
    world_path: WorldPath,
    uses: u64,
    inserted: Instant,
    // insertion order; Instant can tie on coarse clocks
    stamp: u64,
}

/// A bounded path cache with TTL expiry and least-used eviction.
#[derive(Clone, Debug)]
pub struct PathCache {
    entries: HashMap<CacheKey, CacheEntry>,
    config: CacheConfig,
    next_stamp: u64,
    hits: u64,
    misses: u64,
    stored: u64,
    evictions: u64,
}

impl PathCache {
    /// Creates an empty cache.
    pub fn new(config: CacheConfig) -> PathCache {
        PathCache {
            entries: HashMap::with_capacity(config.capacity.min(1024)),
            config,
            next_stamp: 0,
            hits: 0,
            misses: 0,
            stored: 0,
            evictions: 0,
        }
    }

    /// Looks up a route, refreshing its usage count on a hit.
    ///
    /// An entry past its TTL counts as a miss and is removed on the spot; expiry is
    /// only ever checked here, never by a background sweep.
    pub fn get(&mut self, key: &CacheKey) -> Option<&WorldPath> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.inserted.elapsed() >= self.config.ttl,
            None => {
                self.misses += 1;
                return None;
            }
        };
        if expired {
            self.entries.remove(key);
            self.misses += 1;
            return None;
        }
        self.hits += 1;
        let entry = self.entries.get_mut(key)?;
        entry.uses += 1;
        trace!(
            "cache hit for {:?} ({} grid cells, use {})",
            key,
            entry.grid_path.len(),
            entry.uses
        );
        Some(&entry.world_path)
    }

    /// Stores a fresh result, evicting the least-used entry when full.
    ///
    /// Ties on the usage count fall to the oldest insertion, so a burst of one-shot
    /// routes cannot push out an equally-cold but older commuter route any later than
    /// necessary, and never a hotter one.
    pub fn insert(&mut self, key: CacheKey, grid_path: Vec<Point>, world_path: WorldPath) {
        if self.config.capacity == 0 {
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.capacity {
            self.evict_one();
        }
        self.entries.insert(
            key,
            CacheEntry {
                grid_path,
                world_path,
                uses: 0,
                inserted: Instant::now(),
                stamp: self.next_stamp,
            },
        );
        self.next_stamp += 1;
        self.stored += 1;
    }

    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.uses, entry.stamp))
            .map(|(key, _)| *key);
        if let Some(key) = victim {
            self.entries.remove(&key);
            self.evictions += 1;
        }
    }

    /// The grid-space path of a cached route, if present and fresh.
    ///
    /// Does not touch usage counts, so it cannot skew the eviction order.
    #[cfg(test)]
    fn peek_grid_path(&self, key: &CacheKey) -> Option<&[Point]> {
        let entry = self.entries.get(key)?;
        if entry.inserted.elapsed() >= self.config.ttl {
            return None;
        }
        Some(&entry.grid_path)
    }

    /// Drops every entry. Counters survive, occupancy goes to zero.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current counters and occupancy.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            stored: self.stored,
            evictions: self.evictions,
            occupancy: self.entries.len(),
        }
    }
}
