#![forbid(unsafe_code)]

//! Terminal cell width of a single grapheme cluster.
//!
//! This crate answers one question: how many terminal cells (0, 1 or 2)
//! does one already-segmented grapheme cluster occupy? It layers an ordered
//! cascade of Unicode heuristics on top of a plain per-codepoint reference
//! width, and memoizes results in a bounded cache.
//!
//! - [`classify`] / [`explain`] - the pure classifier
//! - [`catalog`] - codepoint classes the classifier inspects
//! - [`WidthCache`] - owned memo cache that clears itself when full
//! - [`SharedWidthCache`] - the same behind a mutex
//! - [`width`] and friends - a process-wide cached entry point
//!
//! # Example
//! ```
//! use grapheme_width::{CacheConfig, Width, WidthCache, classify_str};
//!
//! assert_eq!(grapheme_width::width("a"), 1);
//! assert_eq!(grapheme_width::width("\u{200B}"), 0);
//! assert_eq!(grapheme_width::width("👨‍👩‍👧"), 2);
//!
//! // The classifier itself is pure and needs no cache.
//! assert_eq!(classify_str("e\u{0301}"), Width::One);
//!
//! // Owned caches for callers that want their own bound.
//! let mut cache = WidthCache::new(CacheConfig::new(512).unwrap());
//! assert_eq!(cache.get_or_classify("한".as_bytes()), Width::Two);
//! ```

pub mod catalog;
pub mod classify;
pub mod config;
pub mod normalize;
pub mod reference;
pub mod width_cache;

pub use classify::{Classification, Rule, Width, classify, classify_str, explain, grapheme_count};
pub use config::{CacheConfig, CacheConfigError, DEFAULT_MAX_CACHE_SIZE, ENV_CACHE_SIZE};
pub use width_cache::{CacheStats, SharedWidthCache, WidthCache, global_cache};

/// Width of one grapheme cluster in terminal cells, via the process-wide
/// cache.
#[inline]
#[must_use]
pub fn width(cluster: &str) -> usize {
    width_bytes(cluster.as_bytes())
}

/// Width of one grapheme cluster given as raw bytes.
///
/// Malformed UTF-8 is measured lossily rather than rejected.
#[inline]
#[must_use]
pub fn width_bytes(cluster: &[u8]) -> usize {
    global_cache().width(cluster).as_usize()
}

/// Drop every entry in the process-wide cache.
pub fn clear_cache() {
    global_cache().clear();
}

/// Change the process-wide auto-clear ceiling. Takes effect on the next
/// miss.
///
/// # Errors
/// Returns [`CacheConfigError::ZeroCapacity`] for `0`; the ceiling is left
/// unchanged.
pub fn set_max_cache_size(max_entries: usize) -> Result<(), CacheConfigError> {
    global_cache().set_max_entries(max_entries)
}

/// Statistics for the process-wide cache.
#[must_use]
pub fn cache_stats() -> CacheStats {
    global_cache().stats()
}

/// Copy of the process-wide cache contents, for diagnostics.
#[must_use]
pub fn cache_snapshot() -> Vec<(Vec<u8>, Width)> {
    global_cache().snapshot()
}
