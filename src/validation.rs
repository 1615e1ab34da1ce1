//! Request bodies accepted by the catalog API and the checks applied to them
//! before anything reaches the database.

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{CategoryChanges, CollectionChanges, NewCategory, NewCollection};
use crate::error::ApiError;
use crate::types::Status;

/// Body of collection create and update requests
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
    pub featured: Option<bool>,
    pub status: Option<String>,
    pub category_id: Option<String>,
}

/// Body of category create and update requests
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
    pub status: Option<String>,
    pub parent_id: Option<String>,
}

/// Body of the status endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusInput {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusInput {
    pub fn parse(&self) -> Result<Status, ApiError> {
        self.status
            .as_deref()
            .and_then(Status::parse)
            .ok_or_else(|| ApiError::bad_request("Invalid status value"))
    }
}

impl CollectionInput {
    /// Requires name and slug; fills in image, featured and status defaults.
    pub fn into_new(self, default_image: &str) -> Result<NewCollection, ApiError> {
        let (name, slug) = required_name_and_slug(self.name, self.slug)?;

        Ok(NewCollection {
            name,
            slug,
            description: self.description.flatten(),
            image: non_empty(self.image.flatten()).unwrap_or_else(|| default_image.to_string()),
            featured: self.featured.unwrap_or(false),
            status: parse_status(self.status.as_deref())?.unwrap_or(Status::Active),
            category_id: parse_reference("categoryId", self.category_id.as_deref())?,
        })
    }

    pub fn into_changes(self) -> Result<CollectionChanges, ApiError> {
        reject_blank("name", self.name.as_deref())?;
        reject_blank("slug", self.slug.as_deref())?;

        Ok(CollectionChanges {
            name: self.name,
            slug: self.slug,
            description: self.description,
            image: self.image,
            featured: self.featured,
            status: parse_status(self.status.as_deref())?,
            category_id: parse_reference("categoryId", self.category_id.as_deref())?,
        })
    }
}

impl CategoryInput {
    pub fn into_new(self) -> Result<NewCategory, ApiError> {
        let (name, slug) = required_name_and_slug(self.name, self.slug)?;

        Ok(NewCategory {
            name,
            slug,
            description: self.description.flatten(),
            image: non_empty(self.image.flatten()),
            status: parse_status(self.status.as_deref())?.unwrap_or(Status::Active),
            parent_id: parse_reference("parentId", self.parent_id.as_deref())?,
        })
    }

    /// `id` is the category being edited; it may not become its own parent.
    pub fn into_changes(self, id: Uuid) -> Result<CategoryChanges, ApiError> {
        reject_blank("name", self.name.as_deref())?;
        reject_blank("slug", self.slug.as_deref())?;

        let parent_id = parse_reference("parentId", self.parent_id.as_deref())?;
        if parent_id == Some(id) {
            return Err(ApiError::field(
                "Invalid parent category",
                "parentId",
                "A category cannot be its own parent",
            ));
        }

        Ok(CategoryChanges {
            name: self.name,
            slug: self.slug,
            description: self.description,
            image: self.image,
            status: parse_status(self.status.as_deref())?,
            parent_id,
        })
    }
}

/// Tells `"field": null` (`Some(None)`) apart from a missing field (`None`)
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required_name_and_slug(name: Option<String>, slug: Option<String>) -> Result<(String, String), ApiError> {
    let name = non_empty(name);
    let slug = non_empty(slug);

    let mut field_errors = HashMap::new();
    if name.is_none() {
        field_errors.insert("name".to_string(), "Name is required".to_string());
    }
    if slug.is_none() {
        field_errors.insert("slug".to_string(), "Slug is required".to_string());
    }

    match (name, slug) {
        (Some(name), Some(slug)) => Ok((name, slug)),
        _ => Err(ApiError::validation_error("Name and slug are required", Some(field_errors))),
    }
}

fn reject_blank(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some("") => Err(ApiError::field(
            format!("{} cannot be empty", field),
            field,
            "Must not be empty",
        )),
        _ => Ok(()),
    }
}

/// Absent or empty means "leave unset"
fn parse_status(raw: Option<&str>) -> Result<Option<Status>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => Status::parse(value)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request("Invalid status value")),
    }
}

/// Absent or empty means "no reference"
fn parse_reference(field: &str, raw: Option<&str>) -> Result<Option<Uuid>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| ApiError::field("Invalid field format", field, format!("Invalid id: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PLACEHOLDER: &str = "https://img.example/placeholder.jpg";

    fn collection(body: serde_json::Value) -> CollectionInput {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn create_applies_defaults() {
        let new = collection(json!({ "name": "Summer", "slug": "summer", "categoryId": "" }))
            .into_new(PLACEHOLDER)
            .unwrap();
        assert_eq!(new.image, PLACEHOLDER);
        assert!(!new.featured);
        assert_eq!(new.status, Status::Active);
        assert_eq!(new.category_id, None);
    }

    #[test]
    fn create_keeps_given_values() {
        let category = Uuid::new_v4();
        let new = collection(json!({
            "name": "Winter",
            "slug": "winter",
            "image": "https://img.example/w.jpg",
            "featured": true,
            "status": "INACTIVE",
            "categoryId": category.to_string(),
        }))
        .into_new(PLACEHOLDER)
        .unwrap();
        assert_eq!(new.image, "https://img.example/w.jpg");
        assert!(new.featured);
        assert_eq!(new.status, Status::Inactive);
        assert_eq!(new.category_id, Some(category));
    }

    #[test]
    fn create_requires_name_and_slug() {
        let err = collection(json!({ "name": "", "description": "x" }))
            .into_new(PLACEHOLDER)
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        let body = err.to_json();
        assert_eq!(body["error"], "Name and slug are required");
        assert!(body["fieldErrors"]["name"].is_string());
        assert!(body["fieldErrors"]["slug"].is_string());
    }

    #[test]
    fn create_rejects_bad_status_and_reference() {
        let err = collection(json!({ "name": "a", "slug": "a", "status": "DRAFT" }))
            .into_new(PLACEHOLDER)
            .unwrap_err();
        assert_eq!(err.message(), "Invalid status value");

        let err = collection(json!({ "name": "a", "slug": "a", "categoryId": "cat-1" }))
            .into_new(PLACEHOLDER)
            .unwrap_err();
        assert_eq!(err.to_json()["fieldErrors"]["categoryId"], "Invalid id: cat-1");
    }

    #[test]
    fn changes_keep_absent_fields_but_replace_category() {
        let changes = collection(json!({ "featured": true })).into_changes().unwrap();
        assert_eq!(changes.name, None);
        assert_eq!(changes.featured, Some(true));
        assert_eq!(changes.category_id, None);

        assert!(collection(json!({ "slug": "" })).into_changes().is_err());
    }

    #[test]
    fn explicit_null_clears_but_absent_keeps() {
        let cleared = collection(json!({ "description": null, "image": null }))
            .into_changes()
            .unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.image, Some(None));

        let kept = collection(json!({ "name": "Renamed" })).into_changes().unwrap();
        assert_eq!(kept.description, None);
        assert_eq!(kept.image, None);

        let set = collection(json!({ "description": "Warm days" })).into_changes().unwrap();
        assert_eq!(set.description, Some(Some("Warm days".to_string())));

        let input: CategoryInput = serde_json::from_value(json!({ "description": null })).unwrap();
        assert_eq!(input.into_changes(Uuid::new_v4()).unwrap().description, Some(None));
    }

    #[test]
    fn null_image_on_create_gets_the_placeholder() {
        let new = collection(json!({ "name": "a", "slug": "a", "image": null, "description": null }))
            .into_new(PLACEHOLDER)
            .unwrap();
        assert_eq!(new.image, PLACEHOLDER);
        assert_eq!(new.description, None);
    }

    #[test]
    fn category_cannot_parent_itself() {
        let id = Uuid::new_v4();
        let input: CategoryInput = serde_json::from_value(json!({ "parentId": id.to_string() })).unwrap();
        let err = input.into_changes(id).unwrap_err();
        assert_eq!(err.status_code(), 400);

        let other: CategoryInput = serde_json::from_value(json!({ "parentId": Uuid::new_v4().to_string() })).unwrap();
        assert!(other.into_changes(id).is_ok());
    }

    #[test]
    fn category_create_has_no_image_default() {
        let input: CategoryInput = serde_json::from_value(json!({ "name": "Shoes", "slug": "shoes" })).unwrap();
        let new = input.into_new().unwrap();
        assert_eq!(new.image, None);
        assert_eq!(new.status, Status::Active);
    }

    #[test]
    fn status_input() {
        let ok: StatusInput = serde_json::from_value(json!({ "status": "ACTIVE" })).unwrap();
        assert_eq!(ok.parse().unwrap(), Status::Active);

        let missing: StatusInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.parse().unwrap_err().message(), "Invalid status value");

        let wrong: StatusInput = serde_json::from_value(json!({ "status": "ARCHIVED" })).unwrap();
        assert!(wrong.parse().is_err());
    }
}
