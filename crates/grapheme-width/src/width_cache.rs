#![forbid(unsafe_code)]

//! Bounded memo cache for grapheme widths.
//!
//! Classification is a pure function of the cluster bytes, so an entry
//! stays valid for the life of the process. The cache is bounded with a
//! blunt policy: when a miss arrives and the cache already holds its
//! ceiling, every entry is dropped before the new one is stored.
//!
//! # Example
//! ```
//! use grapheme_width::{CacheConfig, Width, WidthCache};
//!
//! let mut cache = WidthCache::new(CacheConfig::new(2).unwrap());
//!
//! assert_eq!(cache.get_or_classify("文".as_bytes()), Width::Two);
//! assert_eq!(cache.get_or_classify("文".as_bytes()), Width::Two);
//!
//! let stats = cache.stats();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.misses, 1);
//!
//! // A third distinct cluster arrives at the ceiling and clears the cache.
//! cache.get_or_classify("a\u{200D}".as_bytes());
//! cache.get_or_classify("😀".as_bytes());
//! assert_eq!(cache.len(), 1);
//! assert_eq!(cache.stats().auto_clears, 1);
//! ```

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::classify::{Width, classify};
use crate::config::{CacheConfig, CacheConfigError};

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    /// Entry count that triggers a full clear.
    pub capacity: usize,
    /// Number of full clears triggered by reaching the ceiling.
    pub auto_clears: u64,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Memo cache from exact cluster bytes to width.
///
/// # Thread Safety
/// `WidthCache` is not thread-safe. Use [`SharedWidthCache`] to share one
/// between threads.
#[derive(Debug)]
pub struct WidthCache {
    entries: FxHashMap<Box<[u8]>, Width>,
    config: CacheConfig,
    hits: u64,
    misses: u64,
    auto_clears: u64,
}

impl WidthCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: FxHashMap::default(),
            config,
            hits: 0,
            misses: 0,
            auto_clears: 0,
        }
    }

    /// Create a cache with the default ceiling (10,000 entries).
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(CacheConfig::default())
    }

    /// Get the cached width, recording a hit or a miss.
    pub fn lookup(&mut self, cluster: &[u8]) -> Option<Width> {
        match self.entries.get(cluster) {
            Some(&width) => {
                self.hits += 1;
                Some(width)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Get the cached width without touching statistics.
    #[must_use]
    pub fn peek(&self, cluster: &[u8]) -> Option<Width> {
        self.entries.get(cluster).copied()
    }

    /// Store a width for `cluster`.
    ///
    /// A new key arriving when the cache is at its ceiling clears the whole
    /// cache first. Overwriting an existing key never clears.
    pub fn store(&mut self, cluster: &[u8], width: Width) {
        if !self.entries.contains_key(cluster) && self.entries.len() >= self.config.max_entries() {
            debug!(
                entries = self.entries.len(),
                max_entries = self.config.max_entries(),
                "width cache full, clearing"
            );
            self.entries.clear();
            self.auto_clears += 1;
        }
        self.entries.insert(cluster.into(), width);
    }

    /// Get the cached width or classify and cache it.
    #[inline]
    pub fn get_or_classify(&mut self, cluster: &[u8]) -> Width {
        self.get_or_compute_with(cluster, classify)
    }

    /// Get the cached width or compute it with a custom function.
    ///
    /// Empty input is width zero and is never cached.
    pub fn get_or_compute_with<F>(&mut self, cluster: &[u8], compute: F) -> Width
    where
        F: FnOnce(&[u8]) -> Width,
    {
        if cluster.is_empty() {
            return Width::Zero;
        }
        if let Some(width) = self.lookup(cluster) {
            return width;
        }
        let width = compute(cluster);
        self.store(cluster, width);
        width
    }

    #[must_use]
    pub fn contains(&self, cluster: &[u8]) -> bool {
        self.entries.contains_key(cluster)
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Change the ceiling. Takes effect on the next miss.
    pub fn set_max_entries(&mut self, max_entries: usize) -> Result<(), CacheConfigError> {
        self.config = CacheConfig::new(max_entries)?;
        debug!(max_entries, "width cache ceiling changed");
        Ok(())
    }

    /// Reset statistics.
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.auto_clears = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
            capacity: self.config.max_entries(),
            auto_clears: self.auto_clears,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry count that triggers a full clear.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.config.max_entries()
    }

    /// Read-only view of the cached entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&[u8], Width)> + '_ {
        self.entries.iter().map(|(key, &width)| (&**key, width))
    }
}

impl Default for WidthCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// A [`WidthCache`] behind a mutex, safe to share between threads.
///
/// Classification runs outside the lock. Two threads missing on the same
/// cluster may both classify it; both get the same answer.
#[derive(Debug, Default)]
pub struct SharedWidthCache {
    inner: Mutex<WidthCache>,
}

impl SharedWidthCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Mutex::new(WidthCache::new(config)),
        }
    }

    // Entries are inserted whole, so a panic while holding the lock cannot
    // leave the map half-written.
    fn lock(&self) -> MutexGuard<'_, WidthCache> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Width of `cluster`, from the cache or freshly classified.
    pub fn width(&self, cluster: &[u8]) -> Width {
        if cluster.is_empty() {
            return Width::Zero;
        }
        if let Some(width) = self.lock().lookup(cluster) {
            return width;
        }
        let width = classify(cluster);
        self.lock().store(cluster, width);
        width
    }

    pub fn clear(&self) {
        self.lock().clear();
        debug!("width cache cleared");
    }

    /// Change the ceiling. Takes effect on the next miss.
    pub fn set_max_entries(&self, max_entries: usize) -> Result<(), CacheConfigError> {
        self.lock().set_max_entries(max_entries)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current entries, for diagnostics.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Width)> {
        self.lock()
            .entries()
            .map(|(key, width)| (key.to_vec(), width))
            .collect()
    }
}

static GLOBAL_CACHE: OnceLock<SharedWidthCache> = OnceLock::new();

/// The process-wide cache, configured from the environment on first use.
pub fn global_cache() -> &'static SharedWidthCache {
    GLOBAL_CACHE.get_or_init(|| SharedWidthCache::new(CacheConfig::from_env()))
}
