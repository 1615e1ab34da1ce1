use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use std::time::Duration;

use super::cache::SessionCache;
use crate::config::GateConfig;
use crate::session::{lookup_with_timeout, Role, Session, SessionProvider, SessionRequest};

/// What the gate does with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    RedirectLogin,
    RedirectUnauthorized,
}

/// Where the session behind a decision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Public,
    Cached,
    Fetched,
}

#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub decision: GateDecision,
    pub resolution: Resolution,
    pub session: Option<Session>,
}

impl GateOutcome {
    /// One of public-passthrough, cached-allow, cached-deny, fetched-allow, fetched-deny
    pub fn class(&self) -> &'static str {
        match (self.resolution, self.decision) {
            (Resolution::Public, _) => "public-passthrough",
            (Resolution::Cached, GateDecision::Pass) => "cached-allow",
            (Resolution::Cached, _) => "cached-deny",
            (Resolution::Fetched, GateDecision::Pass) => "fetched-allow",
            (Resolution::Fetched, _) => "fetched-deny",
        }
    }
}

/// Session check in front of the admin and protected areas
pub struct RequestGate {
    config: GateConfig,
    provider: Arc<dyn SessionProvider>,
    cache: SessionCache,
}

impl RequestGate {
    pub fn new(config: GateConfig, provider: Arc<dyn SessionProvider>) -> Self {
        let cache = SessionCache::new(config.cache_duration(), config.cache_capacity);
        Self { config, provider, cache }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn provider(&self) -> &dyn SessionProvider {
        self.provider.as_ref()
    }

    pub fn session_timeout(&self) -> Duration {
        self.config.session_timeout()
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Matches `/admin` and `/admin/...` but not `/administrator`
    pub fn is_protected(&self, path: &str) -> bool {
        self.config.protected_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.config
            .public_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn is_admin_path(&self, path: &str) -> bool {
        path.starts_with(self.config.admin_prefix.as_str())
    }

    /// Admin paths take ADMIN only; every other protected path takes USER only.
    pub fn decide(role: Option<&Role>, admin_path: bool) -> GateDecision {
        match (role, admin_path) {
            (None, _) => GateDecision::RedirectLogin,
            (Some(Role::Admin), true) => GateDecision::Pass,
            (Some(Role::User), false) => GateDecision::Pass,
            (Some(_), _) => GateDecision::RedirectUnauthorized,
        }
    }

    /// Build the provider request from the incoming headers. Only the
    /// caller's credentials are taken; the provider's address is fixed.
    pub fn session_request(&self, headers: &HeaderMap) -> SessionRequest {
        SessionRequest {
            cookie: header_str(headers, header::COOKIE).to_string(),
            user_agent: header_str(headers, header::USER_AGENT).to_string(),
        }
    }

    fn cache_key(&self, cookie: &str, path: &str) -> String {
        match &self.config.session_cookie {
            Some(name) => SessionCache::key(cookie_value(cookie, name).unwrap_or(""), path),
            None => SessionCache::key(cookie, path),
        }
    }

    /// Session for the caller, from cache when fresh, otherwise from the provider
    pub async fn resolve(&self, request: &SessionRequest, path: &str) -> (Option<Session>, Resolution) {
        let key = self.cache_key(&request.cookie, path);

        if let Some(entry) = self.cache.get(&key).await {
            return (entry.session, Resolution::Cached);
        }

        let lookup = lookup_with_timeout(self.provider(), request, self.session_timeout()).await;
        if lookup.is_degraded() {
            tracing::warn!(path, outcome = lookup.label(), ?lookup, "session lookup failed, treating as signed out");
        } else {
            tracing::debug!(path, outcome = lookup.label(), "session lookup");
        }

        let session = lookup.into_session();
        self.cache.insert(key, session.clone()).await;
        (session, Resolution::Fetched)
    }

    pub async fn check(&self, path: &str, headers: &HeaderMap) -> GateOutcome {
        if !self.is_protected(path) || self.is_public(path) {
            return GateOutcome {
                decision: GateDecision::Pass,
                resolution: Resolution::Public,
                session: None,
            };
        }

        let request = self.session_request(headers);
        let (session, resolution) = self.resolve(&request, path).await;
        let role = session.as_ref().and_then(Session::role);
        let decision = Self::decide(role.as_ref(), self.is_admin_path(path));

        GateOutcome {
            decision,
            resolution,
            session,
        }
    }

    fn redirect(&self, decision: GateDecision) -> Option<Response> {
        match decision {
            GateDecision::Pass => None,
            GateDecision::RedirectLogin => Some(Redirect::temporary(&self.config.login_path).into_response()),
            GateDecision::RedirectUnauthorized => {
                Some(Redirect::temporary(&self.config.unauthorized_path).into_response())
            }
        }
    }
}

/// Gate middleware. Never fails: every request passes or is redirected.
pub async fn request_gate(State(gate): State<Arc<RequestGate>>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let outcome = gate.check(&path, request.headers()).await;

    if outcome.resolution != Resolution::Public {
        tracing::debug!(
            path = %path,
            class = outcome.class(),
            decision = ?outcome.decision,
            "request gate"
        );
    }

    if let Some(redirect) = gate.redirect(outcome.decision) {
        return redirect;
    }

    if let Some(session) = outcome.session {
        request.extensions_mut().insert(session);
    }
    next.run(request).await
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> &str {
    headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or("")
}

fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
