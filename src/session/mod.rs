//! # Session Module
//!
//! Keeps a Spotify session alive across requests.
//!
//! ## Overview
//!
//! A signed-in user carries a [`TokenState`] (access token, expiry instant,
//! refresh token, sticky error flag) in an encrypted cookie. On every request
//! to a session-bearing route the state is decoded and handed to the
//! [`SessionMaterializer`], which decides whether the access token is still
//! usable, refreshes it through a [`Refresher`] when it is not, and projects a
//! read-only [`Session`] for the handlers.
//!
//! ```text
//! cookie ──► TokenState ──► SessionMaterializer ──► Session ──► RequireSession
//!                               │        ▲
//!                               ▼        │
//!                          Refresher (token endpoint)
//! ```
//!
//! ## Failure handling
//!
//! A failed refresh never becomes an error past the materializer. The state
//! keeps its refresh token, gains `error = RefreshFailed`, and the session
//! exposes that flag. Handlers that need a working Spotify token call
//! [`Session::bearer`] and fail with `UpstreamAuthExpired`; handlers that only
//! need the identity keep working.
//!
//! ## Concurrency
//!
//! There is no shared token cache and no refresh lock. Two concurrent
//! requests that both see an expired token may both refresh; each response
//! writes back its own result.

pub mod cookie;
mod gate;
mod materializer;
mod refresh;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::ApiError, types::TokenResponse};

pub use cookie::{SESSION_COOKIE_NAME, SessionRecord, derive_key};
pub use gate::{MaybeSession, RequireSession};
pub use materializer::{Materialized, SessionMaterializer, TokenSource};
pub use refresh::{Refresher, SpotifyRefresher};

/// Sticky failure marker on a [`TokenState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenError {
    #[serde(rename = "RefreshAccessTokenError")]
    RefreshFailed,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::RefreshFailed => f.write_str("RefreshAccessTokenError"),
        }
    }
}

/// Current Spotify credentials of one authenticated identity.
///
/// `expires_at` is an epoch timestamp in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TokenError>,
}

impl TokenState {
    /// State for a token freshly issued at `now_ms`.
    ///
    /// A grant without a refresh token falls back to `fallback_refresh_token`,
    /// so re-linking an account never strands a refresh token we already hold.
    pub fn from_grant(
        grant: &TokenResponse,
        fallback_refresh_token: Option<&str>,
        now_ms: i64,
    ) -> Self {
        TokenState {
            access_token: grant.access_token.clone(),
            refresh_token: grant
                .refresh_token
                .clone()
                .filter(|rt| !rt.is_empty())
                .or_else(|| fallback_refresh_token.map(str::to_string))
                .unwrap_or_default(),
            expires_at: expiry_from(now_ms, grant.expires_in),
            error: None,
        }
    }

    /// `true` while the access token may be used without refreshing.
    pub fn is_fresh_at(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }

    /// Applies a successful refresh response.
    ///
    /// The refresh token is only replaced when the server rotated it.
    pub fn refreshed(self, response: &TokenResponse, now_ms: i64) -> Self {
        TokenState {
            access_token: response.access_token.clone(),
            refresh_token: response
                .refresh_token
                .clone()
                .filter(|rt| !rt.is_empty())
                .unwrap_or(self.refresh_token),
            expires_at: expiry_from(now_ms, response.expires_in),
            error: None,
        }
    }

    /// Marks a failed refresh; everything else is kept for a later retry.
    pub fn failed(self) -> Self {
        TokenState {
            error: Some(TokenError::RefreshFailed),
            ..self
        }
    }
}

fn expiry_from(now_ms: i64, expires_in_secs: i64) -> i64 {
    now_ms.saturating_add(expires_in_secs.saturating_mul(1000))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
}

/// Per-request projection of the auth state handed to handlers.
///
/// Serialized as `{ "accessToken"?, "error"?, "user"?: { "id" } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TokenError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl Session {
    pub(crate) fn project(state: &TokenState, identity: Option<String>) -> Self {
        Session {
            access_token: Some(state.access_token.clone()).filter(|t| !t.is_empty()),
            error: state.error,
            user: identity.filter(|id| !id.is_empty()).map(|id| SessionUser { id }),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    /// Access token for a privileged Spotify call.
    ///
    /// # Errors
    ///
    /// [`ApiError::UpstreamAuthExpired`] when the last refresh failed or no
    /// token is present; proceeding with a known-bad token is never allowed.
    pub fn bearer(&self) -> Result<&str, ApiError> {
        if self.error.is_some() {
            return Err(ApiError::UpstreamAuthExpired);
        }
        self.access_token
            .as_deref()
            .ok_or(ApiError::UpstreamAuthExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(refresh_token: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "at1".into(),
            token_type: Some("Bearer".into()),
            scope: None,
            expires_in: 3600,
            refresh_token: refresh_token.map(str::to_string),
        }
    }

    fn state() -> TokenState {
        TokenState {
            access_token: "at1".into(),
            refresh_token: "rt1".into(),
            expires_at: 10_000,
            error: None,
        }
    }

    #[test]
    fn test_from_grant_computes_expiry_in_millis() {
        let s = TokenState::from_grant(&grant(Some("rt1")), None, 1_000);
        assert_eq!(s.expires_at, 1_000 + 3_600_000);
        assert_eq!(s.refresh_token, "rt1");
        assert!(s.error.is_none());
    }

    #[test]
    fn test_from_grant_prefers_new_refresh_token() {
        let s = TokenState::from_grant(&grant(Some("new")), Some("old"), 0);
        assert_eq!(s.refresh_token, "new");

        let s = TokenState::from_grant(&grant(None), Some("old"), 0);
        assert_eq!(s.refresh_token, "old");

        let s = TokenState::from_grant(&grant(Some("")), Some("old"), 0);
        assert_eq!(s.refresh_token, "old");
    }

    #[test]
    fn test_freshness_boundary() {
        let s = state();
        assert!(s.is_fresh_at(9_999));
        assert!(!s.is_fresh_at(10_000));
        assert!(!s.is_fresh_at(20_000));
    }

    #[test]
    fn test_refreshed_keeps_refresh_token_when_not_rotated() {
        let response = TokenResponse {
            access_token: "at2".into(),
            token_type: None,
            scope: None,
            expires_in: 60,
            refresh_token: None,
        };
        let s = state().failed().refreshed(&response, 50_000);

        assert_eq!(s.access_token, "at2");
        assert_eq!(s.refresh_token, "rt1");
        assert_eq!(s.expires_at, 110_000);
        assert!(s.error.is_none());
    }

    #[test]
    fn test_failed_keeps_everything_but_the_flag() {
        let s = state().failed();
        assert_eq!(s.access_token, "at1");
        assert_eq!(s.refresh_token, "rt1");
        assert_eq!(s.expires_at, 10_000);
        assert_eq!(s.error, Some(TokenError::RefreshFailed));
    }

    #[test]
    fn test_session_json_shape() {
        let session = Session::project(&state().failed(), Some("user-1".into()));
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "accessToken": "at1",
                "error": "RefreshAccessTokenError",
                "user": { "id": "user-1" }
            })
        );
    }

    #[test]
    fn test_bearer_rejects_flagged_session() {
        let ok = Session::project(&state(), Some("u".into()));
        assert_eq!(ok.bearer().unwrap(), "at1");

        let flagged = Session::project(&state().failed(), Some("u".into()));
        assert!(matches!(
            flagged.bearer(),
            Err(ApiError::UpstreamAuthExpired)
        ));

        let mut empty = state();
        empty.access_token.clear();
        let empty = Session::project(&empty, Some("u".into()));
        assert!(matches!(empty.bearer(), Err(ApiError::UpstreamAuthExpired)));
    }
}
