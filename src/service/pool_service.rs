//! Pool service: orchestrates pool operations against the stores.
//!
//! Every operation follows the same sequence: authorize → resolve →
//! mutate → record → return. Metadata-level mutations (create, update)
//! record an audit snapshot; single-post membership changes do not.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;

use crate::auth::{Privilege, PrivilegeChecker};
use crate::domain::{Pool, PoolId, PoolPost, PostId, User};
use crate::error::ApiError;
use crate::persistence::models::SnapshotOperation;
use crate::persistence::{PoolStore, PostStore, SnapshotStore};

/// Field set for a pool creation request.
#[derive(Debug, Clone)]
pub struct PoolCreate {
    /// Name set, at least one.
    pub names: Vec<String>,
    /// Category name.
    pub category: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial ordered post list.
    pub posts: Vec<PostId>,
}

/// Field set for a pool update request.
///
/// `None` means "leave untouched". The description is doubly optional
/// so a present-but-null value clears it while absence keeps it.
#[derive(Debug, Clone, Default)]
pub struct PoolUpdate {
    /// Client's last-known version of the pool. Required, but only
    /// enforced once the pool has been resolved.
    pub version: Option<i64>,
    /// Replacement name set.
    pub names: Option<Vec<String>>,
    /// Replacement category.
    pub category: Option<String>,
    /// Replacement description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Replacement ordered post list.
    pub posts: Option<Vec<PostId>>,
}

/// Orchestration layer for all pool operations.
///
/// Stateless coordinator over the store traits and the privilege
/// table. All privilege checks for a request run before any mutation,
/// so a denied request never applies a partial change.
#[derive(Clone)]
pub struct PoolService {
    pools: Arc<dyn PoolStore>,
    posts: Arc<dyn PostStore>,
    snapshots: Arc<dyn SnapshotStore>,
    privileges: PrivilegeChecker,
}

impl fmt::Debug for PoolService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolService")
            .field("privileges", &self.privileges)
            .finish_non_exhaustive()
    }
}

impl PoolService {
    /// Creates a new `PoolService`.
    #[must_use]
    pub fn new(
        pools: Arc<dyn PoolStore>,
        posts: Arc<dyn PostStore>,
        snapshots: Arc<dyn SnapshotStore>,
        privileges: PrivilegeChecker,
    ) -> Self {
        Self {
            pools,
            posts,
            snapshots,
            privileges,
        }
    }

    /// Creates a new pool.
    ///
    /// Requires `pools:create` before anything is resolved or
    /// persisted. Records a `created` snapshot on success.
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] without the privilege,
    /// [`ApiError::PostNotFound`] for unknown initial posts,
    /// [`ApiError::InvalidRequest`] on invalid names or category.
    pub async fn create_pool(&self, actor: &User, req: PoolCreate) -> Result<Pool, ApiError> {
        self.privileges.check(Privilege::PoolsCreate, actor)?;

        let mut pool = Pool::new(req.names, req.category)?;
        pool.set_description(req.description);
        if !req.posts.is_empty() {
            let resolved = self.resolve_posts(&req.posts).await?;
            pool.set_posts(resolved)?;
        }

        let id = self.pools.insert_pool(&pool).await?;
        pool.id = id;
        for entry in &mut pool.posts {
            entry.pool_id = id;
        }

        self.snapshots
            .record(SnapshotOperation::Created, &pool, actor)
            .await?;

        tracing::info!(pool_id = %id, actor = %actor.name, "pool created");
        Ok(pool)
    }

    /// Applies a metadata update to an existing pool.
    ///
    /// Fields absent from the request are left untouched. All privilege
    /// checks for the present fields run before any mutation; the whole
    /// request is rejected if one is missing. Records a `modified`
    /// snapshot on success. Never takes the creation path.
    ///
    /// # Errors
    ///
    /// [`ApiError::PoolNotFound`], [`ApiError::VersionConflict`],
    /// [`ApiError::Auth`], [`ApiError::PostNotFound`], or
    /// [`ApiError::InvalidRequest`] for a missing version or a failed
    /// mutator validation.
    pub async fn update_pool(
        &self,
        actor: &User,
        id: PoolId,
        update: PoolUpdate,
    ) -> Result<Pool, ApiError> {
        let mut pool = self.pools.pool_by_id(id).await?;

        let supplied = update
            .version
            .ok_or_else(|| ApiError::InvalidRequest("version is required".to_string()))?;
        if supplied != pool.version {
            return Err(ApiError::VersionConflict {
                pool: id,
                actual: pool.version,
                supplied,
            });
        }

        if update.names.is_some() {
            self.privileges.check(Privilege::PoolsEditNames, actor)?;
        }
        if update.category.is_some() {
            self.privileges.check(Privilege::PoolsEditCategory, actor)?;
        }
        if update.description.is_some() {
            self.privileges
                .check(Privilege::PoolsEditDescription, actor)?;
        }
        if update.posts.is_some() {
            self.privileges.check(Privilege::PoolsEditPosts, actor)?;
        }

        if let Some(names) = update.names {
            pool.set_names(names)?;
        }
        if let Some(category) = update.category {
            pool.set_category(category)?;
        }
        if let Some(description) = update.description {
            pool.set_description(description);
        }
        if let Some(post_ids) = update.posts {
            let resolved = self.resolve_posts(&post_ids).await?;
            pool.set_posts(resolved)?;
        }

        let expected = pool.version;
        pool.version += 1;
        pool.last_edit_at = Utc::now();
        self.pools.save_pool(&pool, expected).await?;

        self.snapshots
            .record(SnapshotOperation::Modified, &pool, actor)
            .await?;

        tracing::info!(pool_id = %id, actor = %actor.name, "pool updated");
        Ok(pool)
    }

    /// Adds a single post to a pool.
    ///
    /// Check order: pool exists → post exists → privilege → duplicate.
    /// Bypasses the bulk list mutator and records no snapshot.
    ///
    /// # Errors
    ///
    /// [`ApiError::PoolNotFound`], [`ApiError::PostNotFound`],
    /// [`ApiError::Auth`], or [`ApiError::DuplicatePoolPost`].
    pub async fn add_post_to_pool(
        &self,
        actor: &User,
        pool_id: PoolId,
        post_id: PostId,
    ) -> Result<PoolPost, ApiError> {
        let mut pool = self.pools.pool_by_id(pool_id).await?;
        let post = self.posts.post_by_id(post_id).await?;
        self.privileges.check(Privilege::PoolsEditPosts, actor)?;

        let entry = pool.add_post(post.id)?;
        self.pools.insert_pool_post(&entry).await?;

        tracing::info!(%pool_id, %post_id, actor = %actor.name, "post added to pool");
        Ok(entry)
    }

    /// Removes a single post from a pool.
    ///
    /// Check order: pool exists → post exists → privilege → membership.
    /// Bypasses the bulk list mutator and records no snapshot.
    ///
    /// # Errors
    ///
    /// [`ApiError::PoolNotFound`], [`ApiError::PostNotFound`],
    /// [`ApiError::Auth`], or [`ApiError::PoolPostNotFound`].
    pub async fn remove_post_from_pool(
        &self,
        actor: &User,
        pool_id: PoolId,
        post_id: PostId,
    ) -> Result<(), ApiError> {
        let mut pool = self.pools.pool_by_id(pool_id).await?;
        let post = self.posts.post_by_id(post_id).await?;
        self.privileges.check(Privilege::PoolsEditPosts, actor)?;

        let _ = pool.remove_post(post.id)?;
        self.pools.delete_pool_post(pool_id, post_id).await?;

        tracing::info!(%pool_id, %post_id, actor = %actor.name, "post removed from pool");
        Ok(())
    }

    /// Returns a single pool.
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] without `pools:view`, or
    /// [`ApiError::PoolNotFound`].
    pub async fn get_pool(&self, actor: &User, id: PoolId) -> Result<Pool, ApiError> {
        self.privileges.check(Privilege::PoolsView, actor)?;
        self.pools.pool_by_id(id).await
    }

    /// Returns one page of pools plus the total count.
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] without `pools:list`, or a store failure.
    pub async fn list_pools(
        &self,
        actor: &User,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Pool>, u64), ApiError> {
        self.privileges.check(Privilege::PoolsList, actor)?;
        self.pools.list_pools(offset, limit).await
    }

    /// Total number of membership rows across all pools.
    ///
    /// # Errors
    ///
    /// [`ApiError::Persistence`] on store failure.
    pub async fn pool_post_count(&self) -> Result<u64, ApiError> {
        self.pools.pool_post_count().await
    }

    /// Resolves post IDs, failing on the first unknown one. Returns the
    /// IDs in input order.
    async fn resolve_posts(&self, ids: &[PostId]) -> Result<Vec<PostId>, ApiError> {
        let (_, missing) = self.posts.posts_by_ids(ids).await?;
        if let Some(&first) = missing.first() {
            return Err(ApiError::PostNotFound(first));
        }
        Ok(ids.to_vec())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Rank;
    use crate::persistence::memory::MemoryStore;
    use std::collections::HashMap;

    fn regular() -> User {
        User::new("alice", Rank::Regular)
    }

    fn anonymous() -> User {
        User::anonymous()
    }

    fn make_service() -> (Arc<MemoryStore>, PoolService) {
        make_service_with(PrivilegeChecker::default())
    }

    fn make_service_with(checker: PrivilegeChecker) -> (Arc<MemoryStore>, PoolService) {
        let store = Arc::new(MemoryStore::new());
        let service = PoolService::new(
            Arc::clone(&store) as Arc<dyn PoolStore>,
            Arc::clone(&store) as Arc<dyn PostStore>,
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            checker,
        );
        (store, service)
    }

    fn seeded_pool(id: i64, names: &[&str]) -> Pool {
        let Ok(mut pool) = Pool::new(
            names.iter().map(|n| (*n).to_string()).collect(),
            "default".to_string(),
        ) else {
            panic!("valid pool");
        };
        pool.id = PoolId::new(id);
        pool
    }

    async fn seed_member(store: &MemoryStore, pool_id: i64, post_id: i64) {
        store.seed_post(PostId::new(post_id)).await;
        let entry = PoolPost {
            pool_id: PoolId::new(pool_id),
            post_id: PostId::new(post_id),
            order: 0,
        };
        let Ok(()) = store.insert_pool_post(&entry).await else {
            panic!("seed membership failed");
        };
    }

    #[tokio::test]
    async fn simple_update_applies_all_supplied_fields() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1", "pool2"])).await;
        store.seed_post(PostId::new(1)).await;
        store.seed_post(PostId::new(2)).await;

        let update = PoolUpdate {
            version: Some(1),
            names: Some(vec!["pool3".to_string()]),
            category: Some("series".to_string()),
            description: Some(Some("desc".to_string())),
            posts: Some(vec![PostId::new(1), PostId::new(2)]),
        };
        let Ok(pool) = service.update_pool(&regular(), PoolId::new(1), update).await else {
            panic!("update failed");
        };

        assert_eq!(pool.names, vec!["pool3".to_string()]);
        assert_eq!(pool.category, "series");
        assert_eq!(pool.description.as_deref(), Some("desc"));
        assert_eq!(
            pool.posts.iter().map(|p| p.post_id).collect::<Vec<_>>(),
            vec![PostId::new(1), PostId::new(2)]
        );
        assert_eq!(pool.version, 2);

        let snapshots = store.snapshots().await;
        assert_eq!(snapshots.len(), 1);
        assert_eq!(
            snapshots.first().map(|s| s.operation.as_str()),
            Some("modified")
        );
        assert_eq!(snapshots.first().map(|s| s.actor.as_str()), Some("alice"));
    }

    #[tokio::test]
    async fn omitted_fields_are_left_untouched() {
        let (store, service) = make_service();
        let mut pool = seeded_pool(1, &["pool1"]);
        pool.description = Some("original".to_string());
        store.seed_pool(pool).await;

        let update = PoolUpdate {
            version: Some(1),
            category: Some("series".to_string()),
            ..PoolUpdate::default()
        };
        let Ok(updated) = service.update_pool(&regular(), PoolId::new(1), update).await else {
            panic!("update failed");
        };

        assert_eq!(updated.names, vec!["pool1".to_string()]);
        assert_eq!(updated.description.as_deref(), Some("original"));
        assert_eq!(updated.category, "series");
    }

    #[tokio::test]
    async fn present_null_description_clears_it() {
        let (store, service) = make_service();
        let mut pool = seeded_pool(1, &["pool1"]);
        pool.description = Some("original".to_string());
        store.seed_pool(pool).await;

        let update = PoolUpdate {
            version: Some(1),
            description: Some(None),
            ..PoolUpdate::default()
        };
        let Ok(updated) = service.update_pool(&regular(), PoolId::new(1), update).await else {
            panic!("update failed");
        };
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn updating_non_existing_pool_is_not_found() {
        // Not-found wins whatever the payload, version included.
        let (_, service) = make_service();
        let update = PoolUpdate {
            version: None,
            names: Some(vec!["dummy".to_string()]),
            ..PoolUpdate::default()
        };
        let result = service
            .update_pool(&regular(), PoolId::new(9999), update)
            .await;
        assert!(matches!(result, Err(ApiError::PoolNotFound(_))));
    }

    #[tokio::test]
    async fn missing_version_on_existing_pool_is_rejected() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;

        let update = PoolUpdate {
            category: Some("series".to_string()),
            ..PoolUpdate::default()
        };
        let result = service.update_pool(&regular(), PoolId::new(1), update).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));

        let Ok(pool) = store.pool_by_id(PoolId::new(1)).await else {
            panic!("pool vanished");
        };
        assert_eq!(pool.category, "default");
        assert_eq!(pool.version, 1);
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;

        let update = PoolUpdate {
            version: Some(5),
            category: Some("series".to_string()),
            ..PoolUpdate::default()
        };
        let result = service.update_pool(&regular(), PoolId::new(1), update).await;
        assert!(matches!(
            result,
            Err(ApiError::VersionConflict {
                actual: 1,
                supplied: 5,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn update_without_privilege_applies_nothing() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;
        store.seed_post(PostId::new(1)).await;

        for update in [
            PoolUpdate {
                version: Some(1),
                names: Some(vec!["whatever".to_string()]),
                ..PoolUpdate::default()
            },
            PoolUpdate {
                version: Some(1),
                category: Some("whatever".to_string()),
                ..PoolUpdate::default()
            },
            PoolUpdate {
                version: Some(1),
                posts: Some(vec![PostId::new(1)]),
                ..PoolUpdate::default()
            },
        ] {
            let result = service
                .update_pool(&anonymous(), PoolId::new(1), update)
                .await;
            assert!(matches!(result, Err(ApiError::Auth(_))));
        }

        let Ok(pool) = store.pool_by_id(PoolId::new(1)).await else {
            panic!("pool vanished");
        };
        assert_eq!(pool.names, vec!["pool1".to_string()]);
        assert_eq!(pool.category, "default");
        assert_eq!(pool.version, 1);
        assert!(pool.posts.is_empty());
        assert!(store.snapshots().await.is_empty());
    }

    #[tokio::test]
    async fn one_missing_privilege_rejects_the_whole_request() {
        // Category edits restricted to moderators; a regular user
        // supplying names + category must see no mutation at all.
        let mut overrides = HashMap::new();
        overrides.insert(Privilege::PoolsEditCategory, Rank::Moderator);
        let (store, service) = make_service_with(PrivilegeChecker::new(overrides));
        store.seed_pool(seeded_pool(1, &["pool1"])).await;

        let update = PoolUpdate {
            version: Some(1),
            names: Some(vec!["renamed".to_string()]),
            category: Some("series".to_string()),
            ..PoolUpdate::default()
        };
        let result = service.update_pool(&regular(), PoolId::new(1), update).await;
        assert!(matches!(result, Err(ApiError::Auth(ref p)) if p == "pools:edit:category"));

        let Ok(pool) = store.pool_by_id(PoolId::new(1)).await else {
            panic!("pool vanished");
        };
        assert_eq!(pool.names, vec!["pool1".to_string()]);
        assert_eq!(pool.version, 1);
    }

    #[tokio::test]
    async fn update_with_unknown_post_id_fails() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;
        store.seed_post(PostId::new(1)).await;

        let update = PoolUpdate {
            version: Some(1),
            posts: Some(vec![PostId::new(1), PostId::new(99)]),
            ..PoolUpdate::default()
        };
        let result = service.update_pool(&regular(), PoolId::new(1), update).await;
        assert!(matches!(result, Err(ApiError::PostNotFound(id)) if id == PostId::new(99)));
    }

    #[tokio::test]
    async fn create_pool_records_creation_snapshot() {
        let (store, service) = make_service();
        store.seed_post(PostId::new(1)).await;

        let req = PoolCreate {
            names: vec!["new-pool".to_string()],
            category: "default".to_string(),
            description: None,
            posts: vec![PostId::new(1)],
        };
        let Ok(pool) = service.create_pool(&regular(), req).await else {
            panic!("create failed");
        };
        assert_eq!(pool.version, 1);
        assert_eq!(pool.post_count(), 1);

        let snapshots = store.snapshots().await;
        assert_eq!(snapshots.len(), 1);
        assert_eq!(
            snapshots.first().map(|s| s.operation.as_str()),
            Some("created")
        );
    }

    #[tokio::test]
    async fn create_without_privilege_persists_nothing() {
        let mut overrides = HashMap::new();
        overrides.insert(Privilege::PoolsCreate, Rank::Administrator);
        let (store, service) = make_service_with(PrivilegeChecker::new(overrides));
        store.seed_post(PostId::new(1)).await;

        // Post-edit privilege alone is not enough to create.
        let req = PoolCreate {
            names: vec!["new-pool".to_string()],
            category: "default".to_string(),
            description: None,
            posts: vec![PostId::new(1), PostId::new(2)],
        };
        let result = service.create_pool(&regular(), req).await;
        assert!(matches!(result, Err(ApiError::Auth(ref p)) if p == "pools:create"));

        let Ok((pools, total)) = store.list_pools(0, 10).await else {
            panic!("list failed");
        };
        assert!(pools.is_empty());
        assert_eq!(total, 0);
        assert!(store.snapshots().await.is_empty());
    }

    #[tokio::test]
    async fn add_post_returns_pairing_and_skips_snapshot() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1", "pool2"])).await;
        store.seed_post(PostId::new(1)).await;

        let Ok(entry) = service
            .add_post_to_pool(&regular(), PoolId::new(1), PostId::new(1))
            .await
        else {
            panic!("add failed");
        };
        assert_eq!(entry.pool_id, PoolId::new(1));
        assert_eq!(entry.post_id, PostId::new(1));
        assert_eq!(entry.order, 0);

        assert_eq!(service.pool_post_count().await.ok(), Some(1));
        assert!(store.snapshots().await.is_empty());
    }

    #[tokio::test]
    async fn add_post_to_missing_pool_fails_before_post_lookup() {
        let (store, service) = make_service();
        store.seed_post(PostId::new(1)).await;

        let result = service
            .add_post_to_pool(&regular(), PoolId::new(1), PostId::new(1))
            .await;
        assert!(matches!(result, Err(ApiError::PoolNotFound(_))));
    }

    #[tokio::test]
    async fn add_missing_post_fails() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;

        let result = service
            .add_post_to_pool(&regular(), PoolId::new(1), PostId::new(1))
            .await;
        assert!(matches!(result, Err(ApiError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn add_post_without_privilege_fails_after_existence_checks() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;
        store.seed_post(PostId::new(1)).await;

        let result = service
            .add_post_to_pool(&anonymous(), PoolId::new(1), PostId::new(1))
            .await;
        assert!(matches!(result, Err(ApiError::Auth(_))));
        assert_eq!(service.pool_post_count().await.ok(), Some(0));
    }

    #[tokio::test]
    async fn add_post_twice_is_a_duplicate() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1", "pool2"])).await;
        seed_member(&store, 1, 1).await;

        let result = service
            .add_post_to_pool(&regular(), PoolId::new(1), PostId::new(1))
            .await;
        assert!(matches!(result, Err(ApiError::DuplicatePoolPost { .. })));
        assert_eq!(service.pool_post_count().await.ok(), Some(1));
    }

    #[tokio::test]
    async fn remove_post_drops_the_membership_and_skips_snapshot() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1", "pool2"])).await;
        seed_member(&store, 1, 1).await;
        assert_eq!(service.pool_post_count().await.ok(), Some(1));

        let result = service
            .remove_post_from_pool(&regular(), PoolId::new(1), PostId::new(1))
            .await;
        assert!(result.is_ok());
        assert_eq!(service.pool_post_count().await.ok(), Some(0));
        assert!(store.snapshots().await.is_empty());
    }

    #[tokio::test]
    async fn remove_from_missing_pool_fails() {
        let (store, service) = make_service();
        store.seed_post(PostId::new(1)).await;

        let result = service
            .remove_post_from_pool(&regular(), PoolId::new(1), PostId::new(1))
            .await;
        assert!(matches!(result, Err(ApiError::PoolNotFound(_))));
    }

    #[tokio::test]
    async fn remove_missing_post_fails() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;

        let result = service
            .remove_post_from_pool(&regular(), PoolId::new(1), PostId::new(1))
            .await;
        assert!(matches!(result, Err(ApiError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn remove_without_privilege_fails_even_without_membership() {
        // Privilege is checked before membership, so an anonymous user
        // sees an auth failure whether or not the pair exists.
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;
        store.seed_post(PostId::new(1)).await;

        let result = service
            .remove_post_from_pool(&anonymous(), PoolId::new(1), PostId::new(1))
            .await;
        assert!(matches!(result, Err(ApiError::Auth(_))));
    }

    #[tokio::test]
    async fn remove_non_member_is_not_found() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;
        store.seed_post(PostId::new(1)).await;

        let result = service
            .remove_post_from_pool(&regular(), PoolId::new(1), PostId::new(1))
            .await;
        assert!(matches!(result, Err(ApiError::PoolPostNotFound { .. })));
    }

    #[tokio::test]
    async fn get_pool_is_open_to_anonymous_by_default() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["pool1"])).await;

        let result = service.get_pool(&anonymous(), PoolId::new(1)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn list_pools_pages_and_counts() {
        let (store, service) = make_service();
        store.seed_pool(seeded_pool(1, &["a"])).await;
        store.seed_pool(seeded_pool(2, &["b"])).await;
        store.seed_pool(seeded_pool(3, &["c"])).await;

        let Ok((page, total)) = service.list_pools(&anonymous(), 0, 2).await else {
            panic!("list failed");
        };
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
    }
}
