//! Session shapes returned by the session provider and the seam used to
//! look them up.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod provider;

pub use provider::{HttpSessionProvider, SessionError, SESSION_PATH};

/// Session payload as served by `GET /api/auth/session`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
    /// Any other non-empty role string
    Other(String),
}

impl Role {
    /// Empty role strings count as no role at all.
    pub fn from_claim(raw: &str) -> Option<Self> {
        match raw {
            "" => None,
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            other => Some(Role::Other(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Other(raw) => raw,
        }
    }
}

impl Session {
    pub fn admin(id: impl Into<String>) -> Self {
        Self::with_role(id, "ADMIN")
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::with_role(id, "USER")
    }

    pub fn with_role(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user: Some(SessionUser {
                id: Some(id.into()),
                role: Some(role.into()),
                ..SessionUser::default()
            }),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref()?.role.as_deref().and_then(Role::from_claim)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}

/// What the gate forwards to the session provider
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    pub cookie: String,
    pub user_agent: String,
}

/// Outcome of a single session lookup.
///
/// Only `Found` carries a session; callers collapse everything else to
/// "no session" but the variants stay distinct for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    Found(Session),
    NoSession,
    Rejected(u16),
    Malformed(String),
    Transport(String),
    Timeout,
}

impl SessionLookup {
    pub fn into_session(self) -> Option<Session> {
        match self {
            SessionLookup::Found(session) => Some(session),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionLookup::Found(_) => "found",
            SessionLookup::NoSession => "no_session",
            SessionLookup::Rejected(_) => "rejected",
            SessionLookup::Malformed(_) => "malformed",
            SessionLookup::Transport(_) => "transport_error",
            SessionLookup::Timeout => "timeout",
        }
    }

    /// Lookups that failed for reasons other than "the caller has no session"
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            SessionLookup::Malformed(_) | SessionLookup::Transport(_) | SessionLookup::Timeout
        ) || matches!(self, SessionLookup::Rejected(status) if *status >= 500)
    }
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn lookup(&self, request: &SessionRequest) -> SessionLookup;
}

/// Run a lookup under a deadline. The provider future is dropped when the
/// deadline passes, which cancels any in-flight request.
pub async fn lookup_with_timeout(
    provider: &dyn SessionProvider,
    request: &SessionRequest,
    timeout: Duration,
) -> SessionLookup {
    match tokio::time::timeout(timeout, provider.lookup(request)).await {
        Ok(lookup) => lookup,
        Err(_) => SessionLookup::Timeout,
    }
}
