use serde::Deserialize;
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::error::ApiError;
use crate::types::{PageRequest, Status};

/// Query string shared by the list endpoints. Everything arrives as text
/// so malformed numbers degrade to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub featured: Option<String>,
    pub active: Option<String>,
    pub status: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self, catalog: &CatalogConfig) -> PageRequest {
        PageRequest::from_query(
            self.page.as_deref(),
            self.limit.as_deref(),
            catalog.default_page_limit,
            catalog.max_page_limit,
        )
    }

    pub fn search(&self) -> Option<String> {
        self.search.clone().filter(|s| !s.is_empty())
    }

    /// Present means filter; only the literal "true" selects featured
    pub fn featured(&self) -> Option<bool> {
        self.featured.as_deref().map(|v| v == "true")
    }

    /// `status` wins over the `active=true|false` shorthand
    pub fn status(&self) -> Result<Option<Status>, ApiError> {
        if let Some(raw) = self.status.as_deref().filter(|s| !s.is_empty()) {
            return Status::parse(raw)
                .map(Some)
                .ok_or_else(|| ApiError::bad_request("Invalid status value"));
        }
        Ok(self.active.as_deref().map(|v| {
            if v == "true" {
                Status::Active
            } else {
                Status::Inactive
            }
        }))
    }
}

/// Ids that are not UUIDs cannot name a stored record
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}
