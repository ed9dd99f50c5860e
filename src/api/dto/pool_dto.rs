//! Pool-related DTOs and response serialization.
//!
//! Responses are built by [`serialize_pool`], which honors a caller
//! field selection: an empty selection yields every default field,
//! mirroring the behavior of passing no `fields` query parameter.

use serde::{Deserialize, Deserializer, Serialize};

use super::common_dto::PaginationMeta;
use crate::domain::{Pool, PoolPost};

/// Request body for `POST /pools`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolRequest {
    /// Name set, at least one entry.
    pub names: Vec<String>,
    /// Category name.
    pub category: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Initial ordered post list.
    #[serde(default)]
    pub posts: Vec<i64>,
}

/// Request body for `PUT /pools/{id}`.
///
/// Absent fields are left untouched; `description: null` clears the
/// description.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePoolRequest {
    /// Client's last-known pool version. Checked after the pool is
    /// resolved, so an unknown pool is reported whatever the payload.
    #[serde(default)]
    pub version: Option<i64>,
    /// Replacement name set.
    #[serde(default)]
    pub names: Option<Vec<String>>,
    /// Replacement category.
    #[serde(default)]
    pub category: Option<String>,
    /// Replacement description; explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Replacement ordered post list.
    #[serde(default)]
    pub posts: Option<Vec<i64>>,
}

/// Request body for `POST /pools/{id}/posts`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPoolPostRequest {
    /// Post to append to the pool.
    pub post_id: i64,
}

/// A single pool-post pairing, returned by the membership endpoints.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolPostDto {
    /// Owning pool.
    pub pool_id: i64,
    /// Member post.
    pub post_id: i64,
    /// Zero-based position within the pool.
    pub order: i32,
}

impl From<&PoolPost> for PoolPostDto {
    fn from(entry: &PoolPost) -> Self {
        Self {
            pool_id: entry.pool_id.get(),
            post_id: entry.post_id.get(),
            order: entry.order,
        }
    }
}

/// Paginated list response for `GET /pools`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PoolListResponse {
    /// Serialized pools.
    pub data: Vec<serde_json::Value>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Field names [`serialize_pool`] emits when no selection is given.
pub const DEFAULT_POOL_FIELDS: [&str; 9] = [
    "id",
    "version",
    "names",
    "category",
    "description",
    "posts",
    "postCount",
    "creationTime",
    "lastEditTime",
];

/// Serializes a pool for API responses.
///
/// `options` selects the emitted fields; an empty slice means the full
/// default field set. Unknown field names are ignored.
#[must_use]
pub fn serialize_pool(pool: &Pool, options: &[String]) -> serde_json::Value {
    let field_value = |field: &str| -> Option<serde_json::Value> {
        match field {
            "id" => Some(serde_json::json!(pool.id)),
            "version" => Some(serde_json::json!(pool.version)),
            "names" => Some(serde_json::json!(pool.names)),
            "category" => Some(serde_json::json!(pool.category)),
            "description" => Some(serde_json::json!(pool.description)),
            "posts" => Some(serde_json::json!(
                pool.posts.iter().map(|p| p.post_id).collect::<Vec<_>>()
            )),
            "postCount" => Some(serde_json::json!(pool.post_count())),
            "creationTime" => Some(serde_json::json!(pool.created_at)),
            "lastEditTime" => Some(serde_json::json!(pool.last_edit_at)),
            _ => None,
        }
    };

    let mut map = serde_json::Map::new();
    if options.is_empty() {
        for field in DEFAULT_POOL_FIELDS {
            if let Some(value) = field_value(field) {
                map.insert(field.to_string(), value);
            }
        }
    } else {
        for field in options {
            if let Some(value) = field_value(field) {
                map.insert(field.clone(), value);
            }
        }
    }
    serde_json::Value::Object(map)
}

/// Distinguishes an absent field from an explicit `null`: a present
/// value (including `null`) always deserializes to `Some(..)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::{PoolId, PostId};

    fn pool() -> Pool {
        let Ok(mut pool) = Pool::new(vec!["pool1".to_string()], "default".to_string()) else {
            panic!("valid pool");
        };
        pool.id = PoolId::new(7);
        let _ = pool.set_posts(vec![PostId::new(2), PostId::new(5)]);
        pool
    }

    #[test]
    fn empty_options_serialize_all_default_fields() {
        let value = serialize_pool(&pool(), &[]);
        let Some(map) = value.as_object() else {
            panic!("expected object");
        };
        assert_eq!(map.len(), DEFAULT_POOL_FIELDS.len());
        assert_eq!(value["id"], serde_json::json!(7));
        assert_eq!(value["posts"], serde_json::json!([2, 5]));
        assert_eq!(value["postCount"], serde_json::json!(2));
    }

    #[test]
    fn options_select_exactly_the_requested_fields() {
        let options = vec!["id".to_string(), "names".to_string()];
        let value = serialize_pool(&pool(), &options);
        let Some(map) = value.as_object() else {
            panic!("expected object");
        };
        assert_eq!(map.len(), 2);
        assert_eq!(value["names"], serde_json::json!(["pool1"]));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let options = vec!["id".to_string(), "bogus".to_string()];
        let value = serialize_pool(&pool(), &options);
        let Some(map) = value.as_object() else {
            panic!("expected object");
        };
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn update_request_distinguishes_absent_and_null_description() {
        let Ok(absent) = serde_json::from_str::<UpdatePoolRequest>(r#"{"version": 1}"#) else {
            panic!("deserialization failed");
        };
        assert_eq!(absent.description, None);
        assert_eq!(absent.version, Some(1));

        let Ok(null) =
            serde_json::from_str::<UpdatePoolRequest>(r#"{"version": 1, "description": null}"#)
        else {
            panic!("deserialization failed");
        };
        assert_eq!(null.description, Some(None));

        let Ok(set) =
            serde_json::from_str::<UpdatePoolRequest>(r#"{"version": 1, "description": "d"}"#)
        else {
            panic!("deserialization failed");
        };
        assert_eq!(set.description, Some(Some("d".to_string())));
    }

    #[test]
    fn update_request_parses_without_version() {
        let Ok(req) = serde_json::from_str::<UpdatePoolRequest>(r#"{"names": ["a"]}"#) else {
            panic!("deserialization failed");
        };
        assert_eq!(req.version, None);
        assert_eq!(req.names, Some(vec!["a".to_string()]));
    }

    #[test]
    fn add_request_uses_camel_case_post_id() {
        let Ok(req) = serde_json::from_str::<AddPoolPostRequest>(r#"{"postId": 3}"#) else {
            panic!("deserialization failed");
        };
        assert_eq!(req.post_id, 3);
    }
}
