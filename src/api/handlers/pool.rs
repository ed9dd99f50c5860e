//! Pool endpoint handlers: create, update, get, list, and single-post
//! membership changes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::dto::{
    AddPoolPostRequest, CreatePoolRequest, PaginationMeta, PaginationParams, PoolListResponse,
    PoolPostDto, UpdatePoolRequest, serialize_pool,
};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::{PoolId, PostId};
use crate::error::{ApiError, ErrorResponse};
use crate::service::{PoolCreate, PoolUpdate};

/// Query parameters selecting serialized output fields.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct FieldsParams {
    /// Comma-separated field names; absent means all default fields.
    #[serde(default)]
    pub fields: Option<String>,
}

impl FieldsParams {
    fn options(&self) -> Vec<String> {
        self.fields
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// `POST /pools` — Create a new pool.
///
/// # Errors
///
/// Returns [`ApiError`] on missing privilege, unknown posts, or
/// invalid names/category.
#[utoipa::path(
    post,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "Create a new pool",
    description = "Creates a pool with the given names, category, optional description, and initial ordered post list. Requires the pools:create privilege.",
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool created successfully", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Missing privilege", body = ErrorResponse),
        (status = 404, description = "Unknown post id", body = ErrorResponse),
    )
)]
pub async fn create_pool(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreatePoolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state
        .pool_service
        .create_pool(
            &user,
            PoolCreate {
                names: req.names,
                category: req.category,
                description: req.description,
                posts: req.posts.into_iter().map(PostId::new).collect(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(serialize_pool(&pool, &[]))))
}

/// `PUT /pools/:id` — Update pool metadata.
///
/// Fields absent from the body are left untouched; the whole request is
/// rejected if any per-field privilege is missing.
///
/// # Errors
///
/// Returns [`ApiError`] on unknown pool, version conflict, missing
/// privilege, or unknown posts.
#[utoipa::path(
    put,
    path = "/api/v1/pools/{id}",
    tag = "Pools",
    summary = "Update pool metadata",
    description = "Applies the supplied fields to the pool. Each present field requires its own pools:edit:* privilege; the version field must match the stored pool version.",
    params(
        ("id" = i64, Path, description = "Pool ID"),
    ),
    request_body = UpdatePoolRequest,
    responses(
        (status = 200, description = "Updated pool", body = serde_json::Value),
        (status = 400, description = "Missing version or invalid field", body = ErrorResponse),
        (status = 403, description = "Missing privilege", body = ErrorResponse),
        (status = 404, description = "Pool or post not found", body = ErrorResponse),
        (status = 409, description = "Version conflict", body = ErrorResponse),
    )
)]
pub async fn update_pool(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdatePoolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state
        .pool_service
        .update_pool(
            &user,
            PoolId::new(id),
            PoolUpdate {
                version: req.version,
                names: req.names,
                category: req.category,
                description: req.description,
                posts: req
                    .posts
                    .map(|ids| ids.into_iter().map(PostId::new).collect()),
            },
        )
        .await?;

    Ok(Json(serialize_pool(&pool, &[])))
}

/// `GET /pools/:id` — Get a single pool.
///
/// # Errors
///
/// Returns [`ApiError::PoolNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{id}",
    tag = "Pools",
    summary = "Get pool details",
    description = "Returns the pool, optionally restricted to the fields named in the fields query parameter.",
    params(
        ("id" = i64, Path, description = "Pool ID"),
        FieldsParams,
    ),
    responses(
        (status = 200, description = "Pool details", body = serde_json::Value),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<FieldsParams>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.pool_service.get_pool(&user, PoolId::new(id)).await?;
    Ok(Json(serialize_pool(&pool, &params.options())))
}

/// `GET /pools` — List pools with pagination.
///
/// # Errors
///
/// Returns [`ApiError`] on missing privilege or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "List pools",
    description = "Returns a paginated list of pools ordered by ID.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated pool list", body = PoolListResponse),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let params = params.clamped();
    let (pools, total) = state
        .pool_service
        .list_pools(&user, params.offset(), i64::from(params.per_page))
        .await?;

    let total = u32::try_from(total).unwrap_or(u32::MAX);
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(params.per_page)
    };

    Ok(Json(PoolListResponse {
        data: pools.iter().map(|p| serialize_pool(p, &[])).collect(),
        pagination: PaginationMeta {
            page: params.page,
            per_page: params.per_page,
            total,
            total_pages,
        },
    }))
}

/// `POST /pools/:id/posts` — Add a single post to a pool.
///
/// Returns only the created pairing, never the full pool, and records
/// no snapshot.
///
/// # Errors
///
/// Returns [`ApiError`] on unknown pool or post, missing privilege, or
/// duplicate membership.
#[utoipa::path(
    post,
    path = "/api/v1/pools/{id}/posts",
    tag = "Pools",
    summary = "Add a post to a pool",
    description = "Appends the post at the end of the pool. Fails if the post is already a member.",
    params(
        ("id" = i64, Path, description = "Pool ID"),
    ),
    request_body = AddPoolPostRequest,
    responses(
        (status = 200, description = "Created pairing", body = PoolPostDto),
        (status = 403, description = "Missing privilege", body = ErrorResponse),
        (status = 404, description = "Pool or post not found", body = ErrorResponse),
        (status = 409, description = "Post already in pool", body = ErrorResponse),
    )
)]
pub async fn add_post_to_pool(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AuthUser(user): AuthUser,
    Json(req): Json<AddPoolPostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .pool_service
        .add_post_to_pool(&user, PoolId::new(id), PostId::new(req.post_id))
        .await?;

    Ok(Json(PoolPostDto::from(&entry)))
}

/// `DELETE /pools/:id/posts/:post_id` — Remove a single post from a pool.
///
/// # Errors
///
/// Returns [`ApiError`] on unknown pool or post, missing privilege, or
/// absent membership.
#[utoipa::path(
    delete,
    path = "/api/v1/pools/{id}/posts/{post_id}",
    tag = "Pools",
    summary = "Remove a post from a pool",
    description = "Deletes the membership. Fails if the post is not currently a member.",
    params(
        ("id" = i64, Path, description = "Pool ID"),
        ("post_id" = i64, Path, description = "Post ID"),
    ),
    responses(
        (status = 204, description = "Membership removed"),
        (status = 403, description = "Missing privilege", body = ErrorResponse),
        (status = 404, description = "Pool, post, or membership not found", body = ErrorResponse),
    )
)]
pub async fn remove_post_from_pool(
    State(state): State<AppState>,
    Path((id, post_id)): Path<(i64, i64)>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    state
        .pool_service
        .remove_post_from_pool(&user, PoolId::new(id), PostId::new(post_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Pool management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", post(create_pool).get(list_pools))
        .route("/pools/{id}", get(get_pool).put(update_pool))
        .route("/pools/{id}/posts", post(add_post_to_pool))
        .route(
            "/pools/{id}/posts/{post_id}",
            delete(remove_post_from_pool),
        )
}
