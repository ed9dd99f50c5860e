//! PostgreSQL implementation of the store traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::{SnapshotOperation, snapshot_data};
use super::{PoolStore, PostStore, SnapshotStore};
use crate::domain::{Pool, PoolId, PoolPost, Post, PostId, User};
use crate::error::ApiError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// Implements all three store traits against the schema in
/// `migrations/`. Multi-row writes run inside a single transaction.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    db: PgPool,
}

impl PostgresStore {
    /// Creates a store with the given connection pool.
    #[must_use]
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn load_names(&self, id: PoolId) -> Result<Vec<String>, ApiError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT name FROM pool_names WHERE pool_id = $1 ORDER BY ord ASC",
        )
        .bind(id.get())
        .fetch_all(&self.db)
        .await
        .map_err(persistence_err)?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn load_posts(&self, id: PoolId) -> Result<Vec<PoolPost>, ApiError> {
        let rows = sqlx::query_as::<_, (i64, i32)>(
            "SELECT post_id, ord FROM pool_posts WHERE pool_id = $1 ORDER BY ord ASC",
        )
        .bind(id.get())
        .fetch_all(&self.db)
        .await
        .map_err(persistence_err)?;
        Ok(rows
            .into_iter()
            .map(|(post_id, order)| PoolPost {
                pool_id: id,
                post_id: PostId::new(post_id),
                order,
            })
            .collect())
    }
}

fn persistence_err(e: sqlx::Error) -> ApiError {
    ApiError::Persistence(e.to_string())
}

#[async_trait]
impl PoolStore for PostgresStore {
    async fn pool_by_id(&self, id: PoolId) -> Result<Pool, ApiError> {
        let row = sqlx::query_as::<
            _,
            (i64, i64, String, Option<String>, DateTime<Utc>, DateTime<Utc>),
        >(
            "SELECT id, version, category, description, created_at, last_edit_at \
             FROM pools WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.db)
        .await
        .map_err(persistence_err)?
        .ok_or(ApiError::PoolNotFound(id))?;

        let (_, version, category, description, created_at, last_edit_at) = row;
        Ok(Pool {
            id,
            version,
            names: self.load_names(id).await?,
            category,
            description,
            posts: self.load_posts(id).await?,
            created_at,
            last_edit_at,
        })
    }

    async fn insert_pool(&self, pool: &Pool) -> Result<PoolId, ApiError> {
        let mut tx = self.db.begin().await.map_err(persistence_err)?;

        let (id,) = sqlx::query_as::<_, (i64,)>(
            "INSERT INTO pools (version, category, description, created_at, last_edit_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(pool.version)
        .bind(&pool.category)
        .bind(&pool.description)
        .bind(pool.created_at)
        .bind(pool.last_edit_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(persistence_err)?;

        for (ord, name) in pool.names.iter().enumerate() {
            sqlx::query("INSERT INTO pool_names (pool_id, name, ord) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(name)
                .bind(i32::try_from(ord).unwrap_or(i32::MAX))
                .execute(&mut *tx)
                .await
                .map_err(persistence_err)?;
        }
        for entry in &pool.posts {
            sqlx::query("INSERT INTO pool_posts (pool_id, post_id, ord) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(entry.post_id.get())
                .bind(entry.order)
                .execute(&mut *tx)
                .await
                .map_err(persistence_err)?;
        }

        tx.commit().await.map_err(persistence_err)?;
        Ok(PoolId::new(id))
    }

    async fn save_pool(&self, pool: &Pool, expected_version: i64) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await.map_err(persistence_err)?;

        let result = sqlx::query(
            "UPDATE pools SET version = $1, category = $2, description = $3, last_edit_at = $4 \
             WHERE id = $5 AND version = $6",
        )
        .bind(pool.version)
        .bind(&pool.category)
        .bind(&pool.description)
        .bind(pool.last_edit_at)
        .bind(pool.id.get())
        .bind(expected_version)
        .execute(&mut *tx)
        .await
        .map_err(persistence_err)?;

        if result.rows_affected() == 0 {
            let actual = sqlx::query_as::<_, (i64,)>("SELECT version FROM pools WHERE id = $1")
                .bind(pool.id.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(persistence_err)?;
            return match actual {
                Some((actual,)) => Err(ApiError::VersionConflict {
                    pool: pool.id,
                    actual,
                    supplied: expected_version,
                }),
                None => Err(ApiError::PoolNotFound(pool.id)),
            };
        }

        sqlx::query("DELETE FROM pool_names WHERE pool_id = $1")
            .bind(pool.id.get())
            .execute(&mut *tx)
            .await
            .map_err(persistence_err)?;
        for (ord, name) in pool.names.iter().enumerate() {
            sqlx::query("INSERT INTO pool_names (pool_id, name, ord) VALUES ($1, $2, $3)")
                .bind(pool.id.get())
                .bind(name)
                .bind(i32::try_from(ord).unwrap_or(i32::MAX))
                .execute(&mut *tx)
                .await
                .map_err(persistence_err)?;
        }

        sqlx::query("DELETE FROM pool_posts WHERE pool_id = $1")
            .bind(pool.id.get())
            .execute(&mut *tx)
            .await
            .map_err(persistence_err)?;
        for entry in &pool.posts {
            sqlx::query("INSERT INTO pool_posts (pool_id, post_id, ord) VALUES ($1, $2, $3)")
                .bind(pool.id.get())
                .bind(entry.post_id.get())
                .bind(entry.order)
                .execute(&mut *tx)
                .await
                .map_err(persistence_err)?;
        }

        tx.commit().await.map_err(persistence_err)
    }

    async fn insert_pool_post(&self, entry: &PoolPost) -> Result<(), ApiError> {
        let result = sqlx::query(
            "INSERT INTO pool_posts (pool_id, post_id, ord) VALUES ($1, $2, $3) \
             ON CONFLICT (pool_id, post_id) DO NOTHING",
        )
        .bind(entry.pool_id.get())
        .bind(entry.post_id.get())
        .bind(entry.order)
        .execute(&self.db)
        .await
        .map_err(persistence_err)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::DuplicatePoolPost {
                pool: entry.pool_id,
                post: entry.post_id,
            });
        }
        Ok(())
    }

    async fn delete_pool_post(&self, pool_id: PoolId, post_id: PostId) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM pool_posts WHERE pool_id = $1 AND post_id = $2")
            .bind(pool_id.get())
            .bind(post_id.get())
            .execute(&self.db)
            .await
            .map_err(persistence_err)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::PoolPostNotFound {
                pool: pool_id,
                post: post_id,
            });
        }
        Ok(())
    }

    async fn pool_post_count(&self) -> Result<u64, ApiError> {
        let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM pool_posts")
            .fetch_one(&self.db)
            .await
            .map_err(persistence_err)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn list_pools(&self, offset: i64, limit: i64) -> Result<(Vec<Pool>, u64), ApiError> {
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM pools")
            .fetch_one(&self.db)
            .await
            .map_err(persistence_err)?;

        let ids = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM pools ORDER BY id ASC OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(persistence_err)?;

        let mut pools = Vec::with_capacity(ids.len());
        for (id,) in ids {
            pools.push(self.pool_by_id(PoolId::new(id)).await?);
        }
        Ok((pools, u64::try_from(total).unwrap_or(0)))
    }
}

#[async_trait]
impl PostStore for PostgresStore {
    async fn post_by_id(&self, id: PostId) -> Result<Post, ApiError> {
        sqlx::query_as::<_, (i64,)>("SELECT id FROM posts WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.db)
            .await
            .map_err(persistence_err)?
            .map(|(id,)| Post {
                id: PostId::new(id),
            })
            .ok_or(ApiError::PostNotFound(id))
    }

    async fn posts_by_ids(&self, ids: &[PostId]) -> Result<(Vec<Post>, Vec<PostId>), ApiError> {
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows = sqlx::query_as::<_, (i64,)>("SELECT id FROM posts WHERE id = ANY($1)")
            .bind(&raw)
            .fetch_all(&self.db)
            .await
            .map_err(persistence_err)?;

        let existing: std::collections::HashSet<i64> = rows.into_iter().map(|(id,)| id).collect();
        let mut found = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for &id in ids {
            if existing.contains(&id.get()) {
                found.push(Post { id });
            } else {
                missing.push(id);
            }
        }
        Ok((found, missing))
    }
}

#[async_trait]
impl SnapshotStore for PostgresStore {
    async fn record(
        &self,
        operation: SnapshotOperation,
        pool: &Pool,
        actor: &User,
    ) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO pool_snapshots (pool_id, operation, actor, data) VALUES ($1, $2, $3, $4)",
        )
        .bind(pool.id.get())
        .bind(operation.as_str())
        .bind(&actor.name)
        .bind(snapshot_data(pool))
        .execute(&self.db)
        .await
        .map_err(persistence_err)?;
        Ok(())
    }
}
