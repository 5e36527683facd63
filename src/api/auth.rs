use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::ApiError,
    management::LinkedAccount,
    server::AppState,
    session::{
        MaybeSession, SessionRecord, TokenSource,
        cookie::{
            clear_pkce_cookies, clear_session_cookie, oauth_state, pkce_cookies, pkce_verifier,
            session_cookie,
        },
    },
    utils,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Starts the authorization-code flow with PKCE.
///
/// The verifier and `state` live in short-lived private cookies until the
/// callback comes back.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Redirect), ApiError> {
    let verifier = utils::generate_code_verifier();
    let challenge = utils::generate_code_challenge(&verifier);
    let oauth_state = utils::generate_oauth_state();

    let url = state.spotify.authorize_url(&oauth_state, &challenge)?;
    let (verifier_cookie, state_cookie) =
        pkce_cookies(&verifier, &oauth_state, state.config.secure_cookies);

    Ok((
        jar.add(verifier_cookie).add(state_cookie),
        Redirect::to(&url),
    ))
}

/// Completes sign-in and issues the session cookie.
///
/// Any failure redirects to `/?error=<reason>`; the PKCE cookies are cleared
/// either way.
pub async fn callback(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> (PrivateCookieJar, Redirect) {
    let result = sign_in(&state, &jar, params).await;

    let (verifier_cookie, state_cookie) = clear_pkce_cookies();
    let jar = jar.remove(verifier_cookie).remove(state_cookie);

    match result {
        Ok(record) => match session_cookie(&record, state.config.secure_cookies) {
            Some(cookie) => {
                tracing::info!(user_id = %record.user_id, "User signed in");
                (jar.add(cookie), Redirect::to("/"))
            }
            None => (jar, error_redirect("session_failed")),
        },
        Err(reason) => {
            tracing::warn!(%reason, "Sign-in failed");
            (jar, error_redirect(reason))
        }
    }
}

fn error_redirect(reason: &str) -> Redirect {
    Redirect::to(&format!("/?error={reason}"))
}

async fn sign_in(
    state: &AppState,
    jar: &PrivateCookieJar,
    params: CallbackParams,
) -> Result<SessionRecord, &'static str> {
    if let Some(error) = params.error {
        tracing::warn!(%error, "Authorization was denied");
        return Err("oauth_error");
    }
    let code = params.code.ok_or("missing_code")?;

    match (params.state, oauth_state(jar)) {
        (Some(returned), Some(expected)) if returned == expected => {}
        _ => return Err("state_mismatch"),
    }
    let verifier = pkce_verifier(jar).ok_or("missing_verifier")?;

    let grant = state
        .spotify
        .exchange_code(&code, &verifier)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Token exchange failed");
            "token_exchange_failed"
        })?;

    let profile = state
        .spotify
        .current_user(&grant.access_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Profile lookup failed");
            "profile_failed"
        })?;

    let user = state.library.resolve_user(&profile).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to resolve user");
        "account_resolution_failed"
    })?;

    let fallback_refresh_token = state
        .library
        .find_account(&user.id)
        .await
        .and_then(|account| account.refresh_token);

    let materialized = state
        .materializer
        .materialize(
            TokenSource::SignIn {
                grant: grant.clone(),
                fallback_refresh_token,
            },
            Some(user.id.clone()),
        )
        .await;

    let account = LinkedAccount::spotify(
        &user.id,
        &profile,
        &grant,
        materialized.state.expires_at,
    );
    state.library.link_account(account).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to link account");
        "account_link_failed"
    })?;

    Ok(SessionRecord {
        user_id: user.id,
        token: materialized.state,
    })
}

pub async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    (jar.remove(clear_session_cookie()), Redirect::to("/"))
}

/// Current session as JSON, `{}` when signed out.
pub async fn session(MaybeSession(session): MaybeSession) -> Json<Value> {
    match session.and_then(|s| serde_json::to_value(s).ok()) {
        Some(value) => Json(value),
        None => Json(json!({})),
    }
}
