use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{CategorySummary, Status};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Status,
    pub parent_id: Option<Uuid>,
    pub parent: Option<CategorySummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Status,
    pub parent_id: Option<Uuid>,
    pub parent_name: Option<String>,
    pub parent_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        let parent = match (row.parent_id, row.parent_name, row.parent_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CategorySummary { id, name, slug }),
            _ => None,
        };

        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            image: row.image,
            status: row.status,
            parent_id: row.parent_id,
            parent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Status,
    pub parent_id: Option<Uuid>,
}

/// Same replacement rule as collections: `parent_id` is always written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// `Some(None)` clears the stored value
    pub description: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub status: Option<Status>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFilter {
    pub search: Option<String>,
    pub status: Option<Status>,
}
