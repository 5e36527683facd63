use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

use super::Session;

/// Authenticated session extracted from the request.
///
/// The session cookie layer materializes the [`Session`] before the handler
/// runs; this extractor only checks that one exists and carries an identity.
/// It does not look at the token error flag, so identity-only handlers keep
/// working after a failed refresh. Privileged Spotify calls must go through
/// [`Session::bearer`].
///
/// # Example
///
/// ```rust,ignore
/// async fn list(RequireSession(session): RequireSession) -> impl IntoResponse {
///     format!("Hello, user {}", session.user_id().unwrap_or_default())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

impl RequireSession {
    /// The identity of the signed-in user.
    pub fn user_id(&self) -> &str {
        self.0.user_id().unwrap_or_default()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequireSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_session(parts.extensions.get::<Session>()).map(RequireSession)
    }
}

/// Session if one was materialized for this request, without rejecting.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(parts.extensions.get::<Session>().cloned()))
    }
}

fn require_session(session: Option<&Session>) -> Result<Session, ApiError> {
    match session {
        Some(session) if session.user_id().is_some() => Ok(session.clone()),
        _ => Err(ApiError::Unauthenticated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionUser, TokenError};

    #[test]
    fn test_missing_session_is_rejected() {
        assert!(matches!(
            require_session(None),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn test_session_without_identity_is_rejected() {
        let session = Session {
            access_token: Some("at".into()),
            error: None,
            user: None,
        };
        assert!(matches!(
            require_session(Some(&session)),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn test_flagged_session_still_passes_the_gate() {
        let session = Session {
            access_token: Some("at".into()),
            error: Some(TokenError::RefreshFailed),
            user: Some(SessionUser { id: "u1".into() }),
        };
        let passed = require_session(Some(&session)).unwrap();
        assert_eq!(passed.user_id(), Some("u1"));
        assert!(passed.bearer().is_err());
    }
}
