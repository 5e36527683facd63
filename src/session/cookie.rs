use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use time::Duration;

use crate::server::AppState;

use super::{TokenSource, TokenState};

pub const SESSION_COOKIE_NAME: &str = "moodlist.session-token";
const PKCE_COOKIE_NAME: &str = "moodlist.pkce";
const STATE_COOKIE_NAME: &str = "moodlist.state";

const SESSION_TTL_DAYS: i64 = 30;
const PKCE_TTL_MINUTES: i64 = 10;

/// Serialized form of a signed-in session, stored in the private cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    pub token: TokenState,
}

/// Cookie encryption key derived from the session secret.
///
/// The secret is stretched to the 64 bytes the key needs, so any length works.
pub fn derive_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Runs the session materializer for every request on the wrapped routes.
///
/// Without a session cookie the request passes through untouched and the
/// gate rejects it; no refresh is attempted. Otherwise the materialized
/// [`Session`](super::Session) is put into the request extensions, and when
/// the token state changed the cookie is re-issued on the response.
pub async fn session_layer(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(record) = read_session(&jar) else {
        return next.run(req).await;
    };

    let materialized = state
        .materializer
        .materialize(
            TokenSource::Stored(record.token),
            Some(record.user_id.clone()),
        )
        .await;

    req.extensions_mut().insert(materialized.session);
    let response = next.run(req).await;

    if !materialized.changed {
        return response;
    }

    let record = SessionRecord {
        user_id: record.user_id,
        token: materialized.state,
    };
    match session_cookie(&record, state.config.secure_cookies) {
        Some(cookie) => (jar.add(cookie), response).into_response(),
        None => response,
    }
}

/// Decodes the session record, treating anything unreadable as signed out.
pub fn read_session(jar: &PrivateCookieJar) -> Option<SessionRecord> {
    let cookie = jar.get(SESSION_COOKIE_NAME)?;
    match serde_json::from_str(cookie.value()) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable session cookie");
            None
        }
    }
}

pub fn session_cookie(record: &SessionRecord, secure: bool) -> Option<Cookie<'static>> {
    let value = match serde_json::to_string(record) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode session cookie");
            return None;
        }
    };

    Some(
        Cookie::build((SESSION_COOKIE_NAME, value))
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::days(SESSION_TTL_DAYS))
            .build(),
    )
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// PKCE verifier and `state` cookies for the authorization request.
pub fn pkce_cookies(
    code_verifier: &str,
    oauth_state: &str,
    secure: bool,
) -> (Cookie<'static>, Cookie<'static>) {
    let verifier = Cookie::build((PKCE_COOKIE_NAME, code_verifier.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/api/auth")
        .max_age(Duration::minutes(PKCE_TTL_MINUTES))
        .build();

    let oauth_state = Cookie::build((STATE_COOKIE_NAME, oauth_state.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/api/auth")
        .max_age(Duration::minutes(PKCE_TTL_MINUTES))
        .build();

    (verifier, oauth_state)
}

pub fn clear_pkce_cookies() -> (Cookie<'static>, Cookie<'static>) {
    let verifier = Cookie::build((PKCE_COOKIE_NAME, ""))
        .path("/api/auth")
        .max_age(Duration::ZERO)
        .build();

    let oauth_state = Cookie::build((STATE_COOKIE_NAME, ""))
        .path("/api/auth")
        .max_age(Duration::ZERO)
        .build();

    (verifier, oauth_state)
}

pub fn pkce_verifier(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(PKCE_COOKIE_NAME).map(|c| c.value().to_string())
}

pub fn oauth_state(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(STATE_COOKIE_NAME).map(|c| c.value().to_string())
}
