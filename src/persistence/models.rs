//! Database models for audit snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Pool, PoolId};

/// Which kind of mutation a snapshot records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotOperation {
    /// Pool was created.
    Created,
    /// Pool metadata was modified.
    Modified,
}

impl SnapshotOperation {
    /// Operation discriminator as stored in the `operation` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
        }
    }
}

/// An audit row from the `pool_snapshots` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Auto-increment row ID.
    pub id: i64,
    /// Pool the mutation touched.
    pub pool_id: PoolId,
    /// Operation discriminator (`"created"` / `"modified"`).
    pub operation: String,
    /// Name of the acting user.
    pub actor: String,
    /// JSONB capture of the pool state after the mutation.
    pub data: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Serializes the auditable state of a pool into the snapshot `data`
/// column format.
#[must_use]
pub fn snapshot_data(pool: &Pool) -> serde_json::Value {
    serde_json::json!({
        "names": pool.names,
        "category": pool.category,
        "description": pool.description,
        "posts": pool.posts.iter().map(|p| p.post_id).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::PostId;

    #[test]
    fn snapshot_data_captures_ordered_posts() {
        let Ok(mut pool) = Pool::new(vec!["p1".to_string()], "default".to_string()) else {
            panic!("valid pool");
        };
        let _ = pool.set_posts(vec![PostId::new(2), PostId::new(1)]);
        let data = snapshot_data(&pool);
        assert_eq!(data["posts"], serde_json::json!([2, 1]));
        assert_eq!(data["category"], "default");
    }
}
