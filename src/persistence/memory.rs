//! In-memory implementation of the store traits.
//!
//! Backs the service tests and the `PERSISTENCE_ENABLED=false` dev
//! mode. State lives in `RwLock<HashMap>` maps; the whole store is
//! wiped on process exit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::models::{SnapshotOperation, SnapshotRecord, snapshot_data};
use super::{PoolStore, PostStore, SnapshotStore};
use crate::domain::{Pool, PoolId, PoolPost, Post, PostId, User};
use crate::error::ApiError;

/// Volatile store holding pools, posts, and snapshots in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pools: RwLock<HashMap<PoolId, Pool>>,
    posts: RwLock<HashMap<PostId, Post>>,
    snapshots: RwLock<Vec<SnapshotRecord>>,
    next_pool_id: AtomicI64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_pool_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Seeds a post so existence checks succeed.
    pub async fn seed_post(&self, id: PostId) {
        self.posts.write().await.insert(id, Post { id });
    }

    /// Seeds a pool under a fixed ID, bypassing creation checks.
    pub async fn seed_pool(&self, pool: Pool) {
        let id = pool.id;
        self.next_pool_id.fetch_max(id.get() + 1, Ordering::SeqCst);
        self.pools.write().await.insert(id, pool);
    }

    /// Returns all recorded snapshots, oldest first.
    pub async fn snapshots(&self) -> Vec<SnapshotRecord> {
        self.snapshots.read().await.clone()
    }
}

#[async_trait]
impl PoolStore for MemoryStore {
    async fn pool_by_id(&self, id: PoolId) -> Result<Pool, ApiError> {
        self.pools
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ApiError::PoolNotFound(id))
    }

    async fn insert_pool(&self, pool: &Pool) -> Result<PoolId, ApiError> {
        let id = PoolId::new(self.next_pool_id.fetch_add(1, Ordering::SeqCst));
        let mut stored = pool.clone();
        stored.id = id;
        for entry in &mut stored.posts {
            entry.pool_id = id;
        }
        self.pools.write().await.insert(id, stored);
        Ok(id)
    }

    async fn save_pool(&self, pool: &Pool, expected_version: i64) -> Result<(), ApiError> {
        let mut pools = self.pools.write().await;
        let stored = pools
            .get_mut(&pool.id)
            .ok_or(ApiError::PoolNotFound(pool.id))?;
        if stored.version != expected_version {
            return Err(ApiError::VersionConflict {
                pool: pool.id,
                actual: stored.version,
                supplied: expected_version,
            });
        }
        *stored = pool.clone();
        Ok(())
    }

    async fn insert_pool_post(&self, entry: &PoolPost) -> Result<(), ApiError> {
        let mut pools = self.pools.write().await;
        let pool = pools
            .get_mut(&entry.pool_id)
            .ok_or(ApiError::PoolNotFound(entry.pool_id))?;
        if pool.contains(entry.post_id) {
            return Err(ApiError::DuplicatePoolPost {
                pool: entry.pool_id,
                post: entry.post_id,
            });
        }
        pool.posts.push(*entry);
        Ok(())
    }

    async fn delete_pool_post(&self, pool_id: PoolId, post_id: PostId) -> Result<(), ApiError> {
        let mut pools = self.pools.write().await;
        let pool = pools
            .get_mut(&pool_id)
            .ok_or(ApiError::PoolNotFound(pool_id))?;
        let before = pool.posts.len();
        pool.posts.retain(|p| p.post_id != post_id);
        if pool.posts.len() == before {
            return Err(ApiError::PoolPostNotFound {
                pool: pool_id,
                post: post_id,
            });
        }
        Ok(())
    }

    async fn pool_post_count(&self) -> Result<u64, ApiError> {
        let pools = self.pools.read().await;
        Ok(pools.values().map(|p| p.posts.len() as u64).sum())
    }

    async fn list_pools(&self, offset: i64, limit: i64) -> Result<(Vec<Pool>, u64), ApiError> {
        let pools = self.pools.read().await;
        let total = pools.len() as u64;
        let mut all: Vec<Pool> = pools.values().cloned().collect();
        all.sort_by_key(|p| p.id);
        let page = all
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();
        Ok((page, total))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn post_by_id(&self, id: PostId) -> Result<Post, ApiError> {
        self.posts
            .read()
            .await
            .get(&id)
            .copied()
            .ok_or(ApiError::PostNotFound(id))
    }

    async fn posts_by_ids(&self, ids: &[PostId]) -> Result<(Vec<Post>, Vec<PostId>), ApiError> {
        let posts = self.posts.read().await;
        let mut found = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for &id in ids {
            match posts.get(&id) {
                Some(post) => found.push(*post),
                None => missing.push(id),
            }
        }
        Ok((found, missing))
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn record(
        &self,
        operation: SnapshotOperation,
        pool: &Pool,
        actor: &User,
    ) -> Result<(), ApiError> {
        let mut snapshots = self.snapshots.write().await;
        let id = snapshots.len() as i64 + 1;
        snapshots.push(SnapshotRecord {
            id,
            pool_id: pool.id,
            operation: operation.as_str().to_string(),
            actor: actor.name.clone(),
            data: snapshot_data(pool),
            created_at: Utc::now(),
        });
        Ok(())
    }
}
