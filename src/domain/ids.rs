//! Type-safe entity identifiers.
//!
//! [`PoolId`] and [`PostId`] are newtype wrappers around the store's
//! `BIGSERIAL` keys so pool and post identifiers cannot be confused
//! with each other or with raw integers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a pool.
///
/// Assigned by the store on pool creation and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(i64);

impl PoolId {
    /// Wraps a raw store key.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw store key.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PoolId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a post.
///
/// Posts are opaque to this service beyond existence checks; the ID is
/// the only attribute the pool surface ever touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Wraps a raw store key.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw store key.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
