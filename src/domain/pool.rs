//! Pool entity and its validated mutators.
//!
//! [`Pool`] is the aggregate this service manages: a named, categorized,
//! ordered collection of posts. All field changes go through mutator
//! methods that enforce the domain invariants (non-empty name set, no
//! duplicate memberships, contiguous order indices on bulk replace), so
//! the store only ever persists valid state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PoolId, PostId};
use crate::error::ApiError;

/// A post record, opaque beyond its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub id: PostId,
}

/// Membership of one post in one pool.
///
/// Invariant: a given (pool, post) pair exists at most once, and the
/// order index is unique within its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPost {
    /// Owning pool.
    pub pool_id: PoolId,
    /// Member post.
    pub post_id: PostId,
    /// Zero-based position within the pool.
    pub order: i32,
}

/// A named, categorized, ordered collection of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Unique identifier, assigned by the store.
    pub id: PoolId,
    /// Optimistic-concurrency counter, starts at 1 and bumps on every
    /// metadata save.
    pub version: i64,
    /// Names, at least one; the first is the primary name.
    pub names: Vec<String>,
    /// Category name.
    pub category: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Ordered memberships.
    pub posts: Vec<PoolPost>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last metadata edit timestamp.
    pub last_edit_at: DateTime<Utc>,
}

impl Pool {
    /// Builds a new pool with version 1 and no posts.
    ///
    /// The ID is a placeholder until the store assigns the real key.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the names or category
    /// fail validation.
    pub fn new(names: Vec<String>, category: String) -> Result<Self, ApiError> {
        let now = Utc::now();
        let mut pool = Self {
            id: PoolId::new(0),
            version: 1,
            names: Vec::new(),
            category: String::new(),
            description: None,
            posts: Vec::new(),
            created_at: now,
            last_edit_at: now,
        };
        pool.set_names(names)?;
        pool.set_category(category)?;
        Ok(pool)
    }

    /// Replaces the name set.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the list is empty, any
    /// name is empty or contains whitespace, or the list repeats a name.
    pub fn set_names(&mut self, names: Vec<String>) -> Result<(), ApiError> {
        if names.is_empty() {
            return Err(ApiError::InvalidRequest(
                "a pool needs at least one name".to_string(),
            ));
        }
        for name in &names {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ApiError::InvalidRequest(format!(
                    "invalid pool name: {name:?}"
                )));
            }
        }
        let mut seen = names.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != names.len() {
            return Err(ApiError::InvalidRequest(
                "pool names must be unique".to_string(),
            ));
        }
        self.names = names;
        Ok(())
    }

    /// Replaces the category name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on an empty category.
    pub fn set_category(&mut self, category: String) -> Result<(), ApiError> {
        if category.is_empty() {
            return Err(ApiError::InvalidRequest(
                "pool category must not be empty".to_string(),
            ));
        }
        self.category = category;
        Ok(())
    }

    /// Replaces the description. `None` clears it.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Replaces the whole ordered post list. Order indices are assigned
    /// from list position.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DuplicatePoolPost`] if the list repeats a
    /// post id.
    pub fn set_posts(&mut self, post_ids: Vec<PostId>) -> Result<(), ApiError> {
        let mut seen = post_ids.clone();
        seen.sort_unstable();
        if let Some(dup) = seen.windows(2).find(|w| w.first() == w.last()) {
            return Err(ApiError::DuplicatePoolPost {
                pool: self.id,
                post: dup.first().copied().unwrap_or(PostId::new(0)),
            });
        }
        self.posts = post_ids
            .into_iter()
            .enumerate()
            .map(|(order, post_id)| PoolPost {
                pool_id: self.id,
                post_id,
                order: i32::try_from(order).unwrap_or(i32::MAX),
            })
            .collect();
        Ok(())
    }

    /// Appends a single post at the end of the pool.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DuplicatePoolPost`] if the post is already
    /// a member.
    pub fn add_post(&mut self, post_id: PostId) -> Result<PoolPost, ApiError> {
        if self.contains(post_id) {
            return Err(ApiError::DuplicatePoolPost {
                pool: self.id,
                post: post_id,
            });
        }
        let next_order = self.posts.iter().map(|p| p.order + 1).max().unwrap_or(0);
        let entry = PoolPost {
            pool_id: self.id,
            post_id,
            order: next_order,
        };
        self.posts.push(entry);
        Ok(entry)
    }

    /// Removes a single post from the pool.
    ///
    /// Remaining memberships keep their order indices; gaps are fine,
    /// only relative order matters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PoolPostNotFound`] if the post is not a
    /// member.
    pub fn remove_post(&mut self, post_id: PostId) -> Result<PoolPost, ApiError> {
        let idx = self
            .posts
            .iter()
            .position(|p| p.post_id == post_id)
            .ok_or(ApiError::PoolPostNotFound {
                pool: self.id,
                post: post_id,
            })?;
        Ok(self.posts.remove(idx))
    }

    /// Returns `true` if the post is a member of this pool.
    #[must_use]
    pub fn contains(&self, post_id: PostId) -> bool {
        self.posts.iter().any(|p| p.post_id == post_id)
    }

    /// Number of posts in the pool.
    #[must_use]
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn pool() -> Pool {
        let Ok(pool) = Pool::new(vec!["pool1".to_string()], "default".to_string()) else {
            panic!("valid pool");
        };
        pool
    }

    #[test]
    fn new_pool_starts_at_version_one() {
        let pool = pool();
        assert_eq!(pool.version, 1);
        assert!(pool.posts.is_empty());
        assert_eq!(pool.names, vec!["pool1".to_string()]);
    }

    #[test]
    fn empty_name_list_is_rejected() {
        assert!(Pool::new(vec![], "default".to_string()).is_err());
    }

    #[test]
    fn whitespace_in_name_is_rejected() {
        let mut pool = pool();
        let result = pool.set_names(vec!["has space".to_string()]);
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut pool = pool();
        let result = pool.set_names(vec!["a".to_string(), "a".to_string()]);
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn empty_category_is_rejected() {
        let mut pool = pool();
        assert!(pool.set_category(String::new()).is_err());
    }

    #[test]
    fn set_posts_assigns_sequential_order() {
        let mut pool = pool();
        let result = pool.set_posts(vec![PostId::new(3), PostId::new(1), PostId::new(2)]);
        assert!(result.is_ok());
        let orders: Vec<i32> = pool.posts.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(pool.posts.first().map(|p| p.post_id), Some(PostId::new(3)));
    }

    #[test]
    fn set_posts_rejects_duplicates() {
        let mut pool = pool();
        let result = pool.set_posts(vec![PostId::new(1), PostId::new(1)]);
        assert!(matches!(result, Err(ApiError::DuplicatePoolPost { .. })));
    }

    #[test]
    fn add_post_appends_after_existing() {
        let mut pool = pool();
        let Ok(first) = pool.add_post(PostId::new(1)) else {
            panic!("add failed");
        };
        assert_eq!(first.order, 0);
        let Ok(second) = pool.add_post(PostId::new(2)) else {
            panic!("add failed");
        };
        assert_eq!(second.order, 1);
        assert_eq!(pool.post_count(), 2);
    }

    #[test]
    fn add_post_twice_is_a_duplicate() {
        let mut pool = pool();
        let _ = pool.add_post(PostId::new(1));
        let result = pool.add_post(PostId::new(1));
        assert!(matches!(result, Err(ApiError::DuplicatePoolPost { .. })));
        assert_eq!(pool.post_count(), 1);
    }

    #[test]
    fn remove_post_drops_membership() {
        let mut pool = pool();
        let _ = pool.add_post(PostId::new(1));
        let removed = pool.remove_post(PostId::new(1));
        assert!(removed.is_ok());
        assert_eq!(pool.post_count(), 0);
    }

    #[test]
    fn remove_absent_post_is_not_found() {
        let mut pool = pool();
        let result = pool.remove_post(PostId::new(9));
        assert!(matches!(result, Err(ApiError::PoolPostNotFound { .. })));
    }
}
