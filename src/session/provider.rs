use async_trait::async_trait;
use reqwest::header::{COOKIE, USER_AGENT};
use thiserror::Error;
use url::Url;

use super::{Session, SessionLookup, SessionProvider, SessionRequest};
use crate::config::GateConfig;

/// Path of the session endpoint on the provider's origin
pub const SESSION_PATH: &str = "/api/auth/session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("GATE_SESSION_ORIGIN must be set to the session provider's base URL")]
    MissingOrigin,

    #[error("Invalid session origin: {0}")]
    InvalidOrigin(String),

    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Session provider reached over HTTP at a fixed, configured origin.
///
/// The endpoint is resolved once at construction; nothing in an incoming
/// request can change where lookups are sent.
#[derive(Clone)]
pub struct HttpSessionProvider {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSessionProvider {
    pub fn new(origin: &str) -> Result<Self, SessionError> {
        let base = Url::parse(origin).map_err(|e| SessionError::InvalidOrigin(format!("{}: {}", origin, e)))?;
        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(SessionError::InvalidOrigin(origin.to_string()));
        }
        let endpoint = base
            .join(SESSION_PATH)
            .map_err(|e| SessionError::InvalidOrigin(format!("{}: {}", origin, e)))?;

        // Redirects from the provider are a non-2xx answer, not something to follow
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// Provider for the gate settings. Refuses to start without an origin.
    pub fn from_config(config: &GateConfig) -> Result<Self, SessionError> {
        match config.session_origin.as_deref().map(str::trim) {
            Some(origin) if !origin.is_empty() => Self::new(origin),
            _ => Err(SessionError::MissingOrigin),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn lookup(&self, request: &SessionRequest) -> SessionLookup {
        let response = match self
            .client
            .get(self.endpoint.clone())
            .header(COOKIE, &request.cookie)
            .header(USER_AGENT, &request.user_agent)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return SessionLookup::Timeout,
            Err(e) => return SessionLookup::Transport(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return SessionLookup::Rejected(status.as_u16());
        }

        match response.json::<Option<Session>>().await {
            Ok(Some(session)) => SessionLookup::Found(session),
            Ok(None) => SessionLookup::NoSession,
            Err(e) => SessionLookup::Malformed(e.to_string()),
        }
    }
}
