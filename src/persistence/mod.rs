//! Persistence layer: store traits, PostgreSQL backend, in-memory backend.
//!
//! The service layer depends only on the narrow [`PoolStore`],
//! [`PostStore`], and [`SnapshotStore`] traits. [`postgres::PostgresStore`]
//! is the production implementation; [`memory::MemoryStore`] backs tests
//! and the `PERSISTENCE_ENABLED=false` dev mode.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{Pool, PoolId, PoolPost, Post, PostId, User};
use crate::error::ApiError;
use models::SnapshotOperation;

/// Pool lookup and mutation operations.
///
/// Every method is a single atomic unit: multi-row writes such as
/// [`save_pool`](Self::save_pool) commit entirely or not at all.
#[async_trait]
pub trait PoolStore: Send + Sync {
    /// Loads a pool with its names and ordered memberships.
    ///
    /// # Errors
    ///
    /// [`ApiError::PoolNotFound`] if no such pool exists.
    async fn pool_by_id(&self, id: PoolId) -> Result<Pool, ApiError>;

    /// Persists a freshly built pool and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// [`ApiError::Persistence`] on store failure.
    async fn insert_pool(&self, pool: &Pool) -> Result<PoolId, ApiError>;

    /// Saves all metadata of an existing pool, guarded by optimistic
    /// concurrency: the stored version must equal `expected_version`.
    /// The pool carries the already-bumped version.
    ///
    /// # Errors
    ///
    /// [`ApiError::VersionConflict`] on a version mismatch,
    /// [`ApiError::PoolNotFound`] if the pool vanished.
    async fn save_pool(&self, pool: &Pool, expected_version: i64) -> Result<(), ApiError>;

    /// Inserts a single membership row.
    ///
    /// # Errors
    ///
    /// [`ApiError::DuplicatePoolPost`] if the pair already exists.
    async fn insert_pool_post(&self, entry: &PoolPost) -> Result<(), ApiError>;

    /// Deletes a single membership row.
    ///
    /// # Errors
    ///
    /// [`ApiError::PoolPostNotFound`] if the pair does not exist.
    async fn delete_pool_post(&self, pool_id: PoolId, post_id: PostId) -> Result<(), ApiError>;

    /// Total number of membership rows across all pools.
    ///
    /// # Errors
    ///
    /// [`ApiError::Persistence`] on store failure.
    async fn pool_post_count(&self) -> Result<u64, ApiError>;

    /// Returns one page of pools plus the total pool count.
    ///
    /// # Errors
    ///
    /// [`ApiError::Persistence`] on store failure.
    async fn list_pools(&self, offset: i64, limit: i64) -> Result<(Vec<Pool>, u64), ApiError>;
}

/// Post existence checks; posts are otherwise opaque to this service.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Resolves a single post.
    ///
    /// # Errors
    ///
    /// [`ApiError::PostNotFound`] if no such post exists.
    async fn post_by_id(&self, id: PostId) -> Result<Post, ApiError>;

    /// Resolves many posts at once, splitting into found records and
    /// missing IDs. Result order follows the input order.
    ///
    /// # Errors
    ///
    /// [`ApiError::Persistence`] on store failure.
    async fn posts_by_ids(&self, ids: &[PostId]) -> Result<(Vec<Post>, Vec<PostId>), ApiError>;
}

/// Write-only audit log for pool mutations.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Records which user performed which operation on which pool,
    /// together with the pool's post-mutation state.
    ///
    /// # Errors
    ///
    /// [`ApiError::Persistence`] on store failure.
    async fn record(
        &self,
        operation: SnapshotOperation,
        pool: &Pool,
        actor: &User,
    ) -> Result<(), ApiError>;
}
