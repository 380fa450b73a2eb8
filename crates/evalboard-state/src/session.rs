//! Access tokens issued by the identity provider.
//!
//! The identity provider itself (login, sign-up, password reset) is an
//! external collaborator. This module only holds the resulting token triple,
//! persists it as a cookie blob and refreshes it when it expires.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// Token triple stored in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token attached to backend calls.
    pub access_token: String,
    /// Expiry of the access token, in epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub access_token_expires: DateTime<Utc>,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
}

impl Session {
    /// Returns true once `now` is past the access token's expiry.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now > self.access_token_expires
    }

    /// Encodes the session as a cookie value.
    pub fn to_cookie(&self) -> DashboardResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a session from a cookie value.
    pub fn from_cookie(cookie: &str) -> DashboardResult<Self> {
        Ok(serde_json::from_str(cookie)?)
    }
}

/// Exchanges a refresh token for a new session.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Requests a new token triple from the identity provider.
    async fn refresh(&self, refresh_token: &str) -> DashboardResult<Session>;
}

/// Holds the current session and refreshes it on demand.
///
/// Expired tokens are refreshed before a call is made; a 401 from the
/// backend can force a refresh afterwards. Any refresh failure clears the
/// session and yields [`DashboardError::SessionExpired`], which callers
/// treat as "redirect to login".
pub struct SessionManager {
    refresher: Arc<dyn TokenRefresher>,
    session: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Creates a manager, optionally seeded from a stored cookie.
    pub fn new(refresher: Arc<dyn TokenRefresher>, session: Option<Session>) -> Self {
        Self {
            refresher,
            session: RwLock::new(session),
        }
    }

    /// Current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Replaces the session, e.g. after a login.
    pub fn set_session(&self, session: Session) {
        *self.session.write() = Some(session);
    }

    /// Forgets the session, e.g. on logout.
    pub fn clear(&self) {
        *self.session.write() = None;
    }

    /// Access token valid now, refreshing it first if it has expired.
    pub async fn access_token(&self) -> DashboardResult<String> {
        self.access_token_at(Utc::now()).await
    }

    /// Access token valid at `now`, refreshing it first if it has expired.
    pub async fn access_token_at(&self, now: DateTime<Utc>) -> DashboardResult<String> {
        let session = self.session().ok_or(DashboardError::SessionExpired)?;
        if !session.needs_refresh(now) {
            return Ok(session.access_token);
        }
        self.refresh(&session.refresh_token).await
    }

    /// Refreshes after the backend rejected the current token.
    pub async fn refresh_after_unauthorized(&self) -> DashboardResult<String> {
        let session = self.session().ok_or(DashboardError::SessionExpired)?;
        self.refresh(&session.refresh_token).await
    }

    async fn refresh(&self, refresh_token: &str) -> DashboardResult<String> {
        match self.refresher.refresh(refresh_token).await {
            Ok(session) => {
                tracing::info!(expires = %session.access_token_expires, "refreshed access token");
                let token = session.access_token.clone();
                self.set_session(session);
                Ok(token)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, clearing session");
                self.clear();
                Err(DashboardError::SessionExpired)
            }
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("has_session", &self.session.read().is_some())
            .finish()
    }
}
