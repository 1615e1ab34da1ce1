// handlers/pages.rs - Page descriptors for the gated /admin and /protected areas
//
// These routes only run after the request gate let the caller through, so
// the gate's resolved session is available as a request extension.

use axum::{
    extract::Path,
    http::Uri,
    response::Json,
    Extension,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::navigation::{sidebar, Sidebar};
use crate::session::{Session, SessionUser};

#[derive(Debug, Serialize)]
pub struct Page {
    pub title: String,
    pub path: String,
    /// API endpoint the page reads from or writes to
    pub resource: Option<String>,
    pub sidebar: Sidebar,
}

fn page(title: &str, uri: &Uri, session: Option<Extension<Session>>, resource: Option<String>) -> Json<Page> {
    let session = session.map(|Extension(session)| session);
    Json(Page {
        title: title.to_string(),
        path: uri.path().to_string(),
        resource,
        sidebar: sidebar(session.as_ref(), uri.path()),
    })
}

/// GET /admin/dashboard
pub async fn dashboard(uri: Uri, session: Option<Extension<Session>>) -> Json<Page> {
    page("Dashboard", &uri, session, None)
}

/// GET /admin/collections
pub async fn collections(uri: Uri, session: Option<Extension<Session>>) -> Json<Page> {
    page("Collections", &uri, session, Some("/api/admin/collections".to_string()))
}

/// GET /admin/collections/new
pub async fn collection_new(uri: Uri, session: Option<Extension<Session>>) -> Json<Page> {
    page("New collection", &uri, session, Some("/api/admin/collections".to_string()))
}

/// GET /admin/collections/:id
pub async fn collection_detail(
    Path(id): Path<String>,
    uri: Uri,
    session: Option<Extension<Session>>,
) -> Json<Page> {
    page("Collection", &uri, session, Some(format!("/api/admin/collections/{}", id)))
}

/// GET /admin/collections/:id/edit
pub async fn collection_edit(
    Path(id): Path<String>,
    uri: Uri,
    session: Option<Extension<Session>>,
) -> Json<Page> {
    page("Edit collection", &uri, session, Some(format!("/api/admin/collections/{}", id)))
}

/// GET /admin/categories
pub async fn categories(uri: Uri, session: Option<Extension<Session>>) -> Json<Page> {
    page("Categories", &uri, session, Some("/api/admin/categories".to_string()))
}

/// GET /protected/profile - the signed-in user
pub async fn profile(session: Option<Extension<Session>>) -> ApiResult<SessionUser> {
    let user = session
        .and_then(|Extension(session)| session.user)
        .ok_or_else(|| ApiError::unauthorized("No session"))?;
    Ok(ApiResponse::ok(user))
}
