#![forbid(unsafe_code)]

//! Width cache configuration.
//!
//! The only tunable is the auto-clear ceiling. The process-wide cache reads
//! it from the environment once, at first use; owned caches take it
//! explicitly. Invalid values are rejected here, never during
//! classification.

use std::fmt;
use std::num::NonZeroUsize;

use tracing::warn;

/// Default number of entries before the cache clears itself.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 10_000;

/// Environment variable overriding the process-wide cache ceiling.
pub const ENV_CACHE_SIZE: &str = "GRAPHEME_WIDTH_CACHE_SIZE";

const DEFAULT_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(DEFAULT_MAX_CACHE_SIZE) {
    Some(n) => n,
    None => panic!("default cache size must be non-zero"),
};

/// Rejected cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheConfigError {
    /// A ceiling of zero entries would clear on every miss.
    ZeroCapacity,
    /// The value is not an unsigned integer.
    Unparsable { value: String },
}

impl fmt::Display for CacheConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "cache capacity must be at least 1 entry"),
            Self::Unparsable { value } => {
                write!(f, "cache capacity {value:?} is not a positive integer")
            }
        }
    }
}

impl std::error::Error for CacheConfigError {}

/// Width cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    max_entries: NonZeroUsize,
}

impl CacheConfig {
    /// Config with the given ceiling. Zero is rejected.
    pub fn new(max_entries: usize) -> Result<Self, CacheConfigError> {
        NonZeroUsize::new(max_entries)
            .map(Self::with_max_entries)
            .ok_or(CacheConfigError::ZeroCapacity)
    }

    #[must_use]
    pub const fn with_max_entries(max_entries: NonZeroUsize) -> Self {
        Self { max_entries }
    }

    /// Entry count at which the cache clears itself.
    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries.get()
    }

    /// Parse a ceiling from text, as found in the environment.
    pub fn parse(value: &str) -> Result<Self, CacheConfigError> {
        let parsed = value
            .trim()
            .parse::<usize>()
            .map_err(|_| CacheConfigError::Unparsable {
                value: value.to_string(),
            })?;
        Self::new(parsed)
    }

    /// Read [`ENV_CACHE_SIZE`], falling back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read configuration using a custom environment lookup (for tests).
    ///
    /// Invalid values are logged and ignored.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = get_env(ENV_CACHE_SIZE) else {
            return Self::default();
        };
        match Self::parse(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    var = ENV_CACHE_SIZE,
                    error = %err,
                    default = DEFAULT_MAX_CACHE_SIZE,
                    "ignoring invalid cache size"
                );
                Self::default()
            }
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}
