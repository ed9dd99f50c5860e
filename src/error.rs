//! Service error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{PoolId, PostId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "pool not found: 17",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ApiError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                  |
/// |-----------|--------------------|------------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request              |
/// | 2000–2999 | Not Found / State  | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server             | 500 Internal Server Error    |
/// | 4000–4999 | Authorization      | 403 Forbidden                |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Pool with the given ID was not found.
    #[error("pool not found: {0}")]
    PoolNotFound(PoolId),

    /// Post with the given ID was not found.
    #[error("post not found: {0}")]
    PostNotFound(PostId),

    /// The post is not a member of the pool.
    #[error("post {post} is not in pool {pool}")]
    PoolPostNotFound {
        /// Pool the membership was looked up in.
        pool: PoolId,
        /// Post that is not a member.
        post: PostId,
    },

    /// The post is already a member of the pool.
    #[error("post {post} is already in pool {pool}")]
    DuplicatePoolPost {
        /// Pool the duplicate insert targeted.
        pool: PoolId,
        /// Post that is already a member.
        post: PostId,
    },

    /// Client-supplied version does not match the stored one.
    #[error("version mismatch for pool {pool}: expected {actual}, got {supplied}")]
    VersionConflict {
        /// Pool being edited.
        pool: PoolId,
        /// Version currently stored.
        actual: i64,
        /// Version the client presented.
        supplied: i64,
    },

    /// Acting user lacks the required privilege.
    #[error("insufficient privileges: {0}")]
    Auth(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::PoolNotFound(_) => 2001,
            Self::PostNotFound(_) => 2002,
            Self::PoolPostNotFound { .. } => 2003,
            Self::DuplicatePoolPost { .. } => 2101,
            Self::VersionConflict { .. } => 2102,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
            Self::Auth(_) => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::PoolNotFound(_) | Self::PostNotFound(_) | Self::PoolPostNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::DuplicatePoolPost { .. } | Self::VersionConflict { .. } => StatusCode::CONFLICT,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(
            ApiError::PoolNotFound(PoolId::new(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::PostNotFound(PostId::new(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::PoolPostNotFound {
                pool: PoolId::new(1),
                post: PostId::new(2),
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn conflict_variants_map_to_409() {
        assert_eq!(
            ApiError::DuplicatePoolPost {
                pool: PoolId::new(1),
                post: PostId::new(2),
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::VersionConflict {
                pool: PoolId::new(1),
                actual: 2,
                supplied: 1,
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn auth_maps_to_403_with_4xxx_code() {
        let err = ApiError::Auth("pools:create".to_string());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), 4001);
    }

    #[test]
    fn error_codes_are_distinct() {
        let errors = [
            ApiError::InvalidRequest(String::new()),
            ApiError::PoolNotFound(PoolId::new(1)),
            ApiError::PostNotFound(PostId::new(1)),
            ApiError::PoolPostNotFound {
                pool: PoolId::new(1),
                post: PostId::new(1),
            },
            ApiError::DuplicatePoolPost {
                pool: PoolId::new(1),
                post: PostId::new(1),
            },
            ApiError::VersionConflict {
                pool: PoolId::new(1),
                actual: 1,
                supplied: 2,
            },
            ApiError::Persistence(String::new()),
            ApiError::Internal(String::new()),
            ApiError::Auth(String::new()),
        ];
        let mut codes: Vec<u32> = errors.iter().map(ApiError::error_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
