use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{CategorySummary, Status};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub status: Status,
    pub category_id: Option<Uuid>,
    pub category: Option<CategorySummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Collection joined with its category's name and slug
#[derive(Debug, FromRow)]
pub struct CollectionRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub status: Status,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CollectionRow> for Collection {
    fn from(row: CollectionRow) -> Self {
        let category = match (row.category_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CategorySummary { id, name, slug }),
            _ => None,
        };

        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            image: row.image,
            featured: row.featured,
            status: row.status,
            category_id: row.category_id,
            category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Validated values for a new collection, defaults already applied
#[derive(Debug, Clone, PartialEq)]
pub struct NewCollection {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: String,
    pub featured: bool,
    pub status: Status,
    pub category_id: Option<Uuid>,
}

/// Partial update. `None` keeps the stored value, except `category_id`
/// which always replaces the stored link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// `Some(None)` clears the stored value
    pub description: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub featured: Option<bool>,
    pub status: Option<Status>,
    pub category_id: Option<Uuid>,
}

/// List filters for the collections table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionFilter {
    /// Substring of name or slug
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<Status>,
}
