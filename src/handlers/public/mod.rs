// handlers/public/mod.rs - Public handlers (no session required)
//
// Route Prefix: none. The request gate never checks these paths.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::DatabaseManager;
use crate::error::ApiError;

/// GET / - service information
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Catalog Admin",
            "version": version,
            "endpoints": {
                "pages": "/login, /unauthorized (public)",
                "admin": "/admin/* (ADMIN session)",
                "protected": "/protected/* (USER session)",
                "collections": "/api/admin/collections[/:id[/status]] (ADMIN session)",
                "categories": "/api/admin/categories[/:id[/status]] (ADMIN session)",
                "health": "/health (public)",
            }
        }
    }))
}

/// GET /health - database liveness
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

/// GET /login - where signed-out callers are sent
pub async fn login() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "page": "login",
            "message": "Sign in to continue",
            "session_endpoint": crate::session::SESSION_PATH,
        }
    }))
}

/// GET /unauthorized - where callers with the wrong role are sent
pub async fn unauthorized() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "page": "unauthorized",
            "message": "Your account does not have access to this area",
        }
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
