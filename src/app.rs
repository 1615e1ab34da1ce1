use axum::{
    middleware,
    routing::{get, patch},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::CatalogConfig;
use crate::handlers;
use crate::middleware::{request_gate, RequestGate};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub gate: Arc<RequestGate>,
    pub catalog: Arc<CatalogConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, gate: RequestGate, catalog: CatalogConfig) -> Self {
        Self {
            pool,
            gate: Arc::new(gate),
            catalog: Arc::new(catalog),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let gate = state.gate.clone();

    Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .route("/login", get(handlers::public::login))
        .route("/unauthorized", get(handlers::public::unauthorized))
        // Behind the gate
        .merge(admin_page_routes())
        .merge(protected_routes())
        // Catalog API (admin session checked per handler)
        .merge(collection_routes())
        .merge(category_routes())
        .fallback(handlers::public::not_found)
        .layer(middleware::from_fn_with_state(gate, request_gate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_page_routes() -> Router<AppState> {
    use handlers::pages;

    Router::new()
        .route("/admin", get(pages::dashboard))
        .route("/admin/dashboard", get(pages::dashboard))
        .route("/admin/collections", get(pages::collections))
        .route("/admin/collections/new", get(pages::collection_new))
        .route("/admin/collections/:id", get(pages::collection_detail))
        .route("/admin/collections/:id/edit", get(pages::collection_edit))
        .route("/admin/categories", get(pages::categories))
}

fn protected_routes() -> Router<AppState> {
    Router::new().route("/protected/profile", get(handlers::pages::profile))
}

fn collection_routes() -> Router<AppState> {
    use handlers::admin::collections;

    Router::new()
        .route(
            "/api/admin/collections",
            get(collections::list).post(collections::create),
        )
        .route(
            "/api/admin/collections/:id",
            get(collections::show)
                .put(collections::update)
                .delete(collections::delete),
        )
        .route("/api/admin/collections/:id/status", patch(collections::update_status))
}

fn category_routes() -> Router<AppState> {
    use handlers::admin::categories;

    Router::new()
        .route(
            "/api/admin/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/admin/categories/:id",
            get(categories::show)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/api/admin/categories/:id/status", patch(categories::update_status))
}
