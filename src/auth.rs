//! Authorization: privilege catalog, rank-based permission checks, and
//! the acting-user request extractor.
//!
//! Authentication itself lives upstream (reverse proxy or session
//! layer); this service trusts the `x-user-name` / `x-user-rank`
//! headers it injects. Requests without them act as the anonymous user.

use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::{Rank, User};
use crate::error::ApiError;

/// Header carrying the authenticated account name.
pub const USER_NAME_HEADER: &str = "x-user-name";
/// Header carrying the authenticated account rank.
pub const USER_RANK_HEADER: &str = "x-user-rank";

/// Every operation the pool surface gates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// Create a new pool.
    PoolsCreate,
    /// List pools.
    PoolsList,
    /// View a single pool.
    PoolsView,
    /// Edit a pool's name set.
    PoolsEditNames,
    /// Edit a pool's category.
    PoolsEditCategory,
    /// Edit a pool's description.
    PoolsEditDescription,
    /// Edit a pool's post list or single memberships.
    PoolsEditPosts,
}

impl Privilege {
    /// All privileges, for configuration iteration.
    pub const ALL: [Self; 7] = [
        Self::PoolsCreate,
        Self::PoolsList,
        Self::PoolsView,
        Self::PoolsEditNames,
        Self::PoolsEditCategory,
        Self::PoolsEditDescription,
        Self::PoolsEditPosts,
    ];

    /// Canonical colon-separated operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PoolsCreate => "pools:create",
            Self::PoolsList => "pools:list",
            Self::PoolsView => "pools:view",
            Self::PoolsEditNames => "pools:edit:names",
            Self::PoolsEditCategory => "pools:edit:category",
            Self::PoolsEditDescription => "pools:edit:description",
            Self::PoolsEditPosts => "pools:edit:posts",
        }
    }

    /// Default minimum rank when no configuration overrides it.
    #[must_use]
    pub const fn default_rank(self) -> Rank {
        match self {
            Self::PoolsList | Self::PoolsView => Rank::Anonymous,
            _ => Rank::Regular,
        }
    }
}

impl std::fmt::Display for Privilege {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Privilege-to-minimum-rank table.
///
/// Built once at startup from [`crate::config::AppConfig`] and shared
/// by the service layer. An explicit structure rather than ambient
/// global configuration, so tests can construct arbitrary tables.
#[derive(Debug, Clone)]
pub struct PrivilegeChecker {
    ranks: HashMap<Privilege, Rank>,
}

impl PrivilegeChecker {
    /// Builds a checker from an explicit privilege table. Privileges
    /// missing from the table fall back to their defaults.
    #[must_use]
    pub fn new(overrides: HashMap<Privilege, Rank>) -> Self {
        let mut ranks = HashMap::with_capacity(Privilege::ALL.len());
        for privilege in Privilege::ALL {
            let rank = overrides
                .get(&privilege)
                .copied()
                .unwrap_or_else(|| privilege.default_rank());
            ranks.insert(privilege, rank);
        }
        Self { ranks }
    }

    /// Returns the minimum rank required for the privilege.
    #[must_use]
    pub fn required_rank(&self, privilege: Privilege) -> Rank {
        self.ranks
            .get(&privilege)
            .copied()
            .unwrap_or_else(|| privilege.default_rank())
    }

    /// Allows or denies the operation for the given user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] naming the privilege if the user's
    /// rank is below the required minimum.
    pub fn check(&self, privilege: Privilege, user: &User) -> Result<(), ApiError> {
        if user.rank >= self.required_rank(privilege) {
            Ok(())
        } else {
            Err(ApiError::Auth(privilege.as_str().to_string()))
        }
    }
}

impl Default for PrivilegeChecker {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

/// Acting user extracted from upstream auth headers.
///
/// Missing headers yield the anonymous user; a malformed rank header is
/// a validation error rather than a silent anonymous downgrade.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let rank = match parts
            .headers
            .get(USER_RANK_HEADER)
            .map(|v| v.to_str().map_err(|_| ()))
        {
            None => Rank::Anonymous,
            Some(Ok(raw)) => raw
                .parse()
                .map_err(|e: String| ApiError::InvalidRequest(e))?,
            Some(Err(())) => {
                return Err(ApiError::InvalidRequest(format!(
                    "non-ascii {USER_RANK_HEADER} header"
                )));
            }
        };

        let name = parts
            .headers
            .get(USER_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("anonymous")
            .to_string();

        Ok(Self(User { name, rank }))
    }
}
