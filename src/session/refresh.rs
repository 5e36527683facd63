use std::future::Future;

use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    config::{AppConfig, SpotifyCredentials},
    spotify::auth::basic_authorization,
    types::TokenResponse,
    utils,
};

use super::TokenState;

/// Mints a new access token from a [`TokenState`].
///
/// Implementations never fail: a refresh that did not work comes back as the
/// input state with `error = RefreshFailed` and the refresh token untouched.
pub trait Refresher: Send + Sync + 'static {
    fn refresh(&self, state: TokenState) -> impl Future<Output = TokenState> + Send;
}

/// Refreshes against the Spotify accounts token endpoint.
///
/// Client credentials and the endpoint are injected at construction; the
/// HTTP client carries the outbound timeout, and a timeout is treated like
/// any other network failure.
#[derive(Debug, Clone)]
pub struct SpotifyRefresher {
    http: Client,
    token_url: String,
    credentials: SpotifyCredentials,
}

impl SpotifyRefresher {
    /// Creates a refresher for the given token endpoint.
    ///
    /// # Arguments
    ///
    /// * `http` - Client used for the token request; its timeout bounds each refresh
    /// * `token_url` - Accounts service token endpoint
    /// * `credentials` - Client id and secret sent as HTTP basic auth
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let refresher = SpotifyRefresher::new(
    ///     reqwest::Client::new(),
    ///     "https://accounts.spotify.com/api/token",
    ///     credentials,
    /// );
    /// let state = refresher.refresh(state).await;
    /// ```
    pub fn new(http: Client, token_url: impl Into<String>, credentials: SpotifyCredentials) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            credentials,
        }
    }

    /// Same as [`new`](Self::new) with the endpoint and credentials from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.http_client(),
            config.spotify_token_url.clone(),
            config.credentials.clone(),
        )
    }

    async fn request(&self, refresh_token: &str) -> Result<TokenResponse, String> {
        let res = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, basic_authorization(&self.credentials))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(format!("token endpoint returned {status}: {body}"));
        }

        let token: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
        if token.access_token.is_empty() {
            return Err("token endpoint returned an empty access token".to_string());
        }
        Ok(token)
    }
}

impl Refresher for SpotifyRefresher {
    async fn refresh(&self, state: TokenState) -> TokenState {
        if state.refresh_token.is_empty() {
            tracing::warn!("Cannot refresh access token without a refresh token");
            return state.failed();
        }

        match self.request(&state.refresh_token).await {
            Ok(response) => {
                tracing::debug!(expires_in = response.expires_in, "Access token refreshed");
                state.refreshed(&response, utils::now_millis())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error refreshing access token");
                state.failed()
            }
        }
    }
}
