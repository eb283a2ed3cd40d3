//! Error types for the lrukit library.
//!
//! The error surface is intentionally small: a missing key is an ordinary
//! `None`, never an error. What remains is:
//!
//! - [`ConfigError`]: invalid construction parameters (the only way a public
//!   operation can fail, and only before any cache state exists).
//! - [`InvariantError`]: returned by diagnostic `check_invariants` methods
//!   when the entry store and the recency list have drifted apart.
//!
//! ```
//! use lrukit::error::ConfigError;
//! use lrukit::policy::lru::LruCache;
//!
//! let cache: Result<LruCache<u64, u64>, ConfigError> = LruCache::try_new(0);
//! assert!(cache.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache construction parameters are invalid.
///
/// Produced by [`LruCache::try_new`](crate::policy::lru::LruCache::try_new)
/// when the requested capacity is zero. Carries a human-readable description
/// of the rejected parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`LruCache::check_invariants`](crate::policy::lru::LruCache::check_invariants).
/// A violation means the key index and the recency list disagree about which
/// entries are live; it cannot be reached through the public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
