use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use crate::session::{lookup_with_timeout, Session};

/// Extractor for catalog API handlers: the caller must hold an ADMIN session.
///
/// Looks the session up directly (no gate cache) and answers 401 for any
/// other outcome, including provider failures.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let gate = &state.gate;
        let request = gate.session_request(&parts.headers);
        let lookup = lookup_with_timeout(gate.provider(), &request, gate.session_timeout()).await;

        if lookup.is_degraded() {
            tracing::warn!(path = %parts.uri.path(), outcome = lookup.label(), "admin session lookup failed");
        }

        match lookup.into_session() {
            Some(session) if session.is_admin() => Ok(AdminSession(session)),
            _ => Err(ApiError::unauthorized("Unauthorized")),
        }
    }
}
