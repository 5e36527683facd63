//! # Spotify Integration Module
//!
//! Client for the two Spotify surfaces moodlist talks to: the accounts service
//! (authorization, token exchange) and the Web API (profile, search,
//! playlists, tracks).
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)          session refresh
//!          ↓                         ↓
//!    SpotifyClient            basic_authorization
//!     ├── auth      (authorize URL, code exchange, client credentials)
//!     ├── profile   (GET /me)
//!     ├── tracks    (search, several tracks)
//!     └── playlist  (create, add tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Error Handling
//!
//! Every call returns a [`SpotifyError`]. Transport failures (including the
//! configured timeout) surface as [`SpotifyError::Http`]; non-2xx responses
//! as [`SpotifyError::Status`] carrying the message Spotify put in the error
//! body. A `502 Bad Gateway` is retried once after a short pause before it is
//! reported.
//!
//! ## Authentication
//!
//! Web API calls take the bearer token explicitly. The client never looks at
//! session state; the caller obtains the token through
//! [`Session::bearer`](crate::session::Session::bearer), which has already
//! been refreshed by the session materializer.

pub mod auth;
pub mod playlist;
pub mod profile;
pub mod tracks;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use thiserror::Error;
use tokio::time::sleep;

use crate::{
    config::{AppConfig, SpotifyCredentials},
    types::SpotifyErrorBody,
};

const BAD_GATEWAY_RETRIES: usize = 1;
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spotify returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl SpotifyError {
    async fn from_response(res: Response) -> Self {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<SpotifyErrorBody>(&body)
            .ok()
            .and_then(|b| b.error.message)
            .unwrap_or(body);
        SpotifyError::Status { status, message }
    }
}

/// Spotify accounts and Web API client.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    auth_url: String,
    token_url: String,
    redirect_uri: String,
    scope: String,
    credentials: SpotifyCredentials,
}

impl SpotifyClient {
    /// Builds a client from the application configuration.
    ///
    /// Shares the configured HTTP client, so every call carries the outbound
    /// timeout.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            http: config.http_client(),
            api_url: config.spotify_api_url.clone(),
            auth_url: config.spotify_auth_url.clone(),
            token_url: config.spotify_token_url.clone(),
            redirect_uri: config.spotify_redirect_uri.clone(),
            scope: config.spotify_scope.clone(),
            credentials: config.credentials.clone(),
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Sends a request, retrying once on `502 Bad Gateway`.
    ///
    /// `build` is called once per attempt since a request builder is consumed
    /// by sending it.
    async fn send<F>(&self, build: F) -> Result<Response, SpotifyError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let res = build(&self.http).send().await?;
            let status = res.status();

            if status == StatusCode::BAD_GATEWAY && attempt < BAD_GATEWAY_RETRIES {
                attempt += 1;
                tracing::debug!(attempt, "Spotify returned 502, retrying");
                sleep(RETRY_DELAY).await;
                continue;
            }

            if !status.is_success() {
                return Err(SpotifyError::from_response(res).await);
            }

            return Ok(res);
        }
    }
}
