use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Url, header::AUTHORIZATION};

use crate::{
    config::SpotifyCredentials,
    types::{ClientCredentialsToken, TokenResponse},
};

use super::{SpotifyClient, SpotifyError};

/// `Authorization` header value for the token endpoint.
///
/// Spotify authenticates confidential clients with HTTP basic auth over
/// `client_id:client_secret`.
pub fn basic_authorization(credentials: &SpotifyCredentials) -> String {
    let raw = format!(
        "{}:{}",
        credentials.client_id, credentials.client_secret
    );
    format!("Basic {}", STANDARD.encode(raw))
}

impl SpotifyClient {
    /// Builds the URL the user is redirected to for granting access.
    ///
    /// Uses the authorization-code flow with a PKCE S256 challenge and an
    /// opaque `state` value that the callback must echo back.
    pub fn authorize_url(&self, oauth_state: &str, code_challenge: &str) -> Result<String, SpotifyError> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge),
                ("scope", self.scope.as_str()),
                ("state", oauth_state),
            ],
        )
        .map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;

        Ok(url.to_string())
    }

    /// Exchanges an authorization code for the initial token pair.
    ///
    /// # Arguments
    ///
    /// * `code` - The `code` query parameter Spotify redirected back with
    /// * `verifier` - PKCE code verifier matching the challenge sent in
    ///   [`authorize_url`](Self::authorize_url)
    ///
    /// # Returns
    ///
    /// The raw grant. `refresh_token` may be absent, in which case the caller
    /// keeps the one stored for the account.
    ///
    /// # Errors
    ///
    /// [`SpotifyError::Status`] when the code is invalid, already used, or
    /// does not match the verifier.
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenResponse, SpotifyError> {
        let res = self
            .send(|http| {
                http.post(&self.token_url)
                    .header(AUTHORIZATION, basic_authorization(&self.credentials))
                    .form(&[
                        ("grant_type", "authorization_code"),
                        ("code", code),
                        ("code_verifier", verifier),
                        ("redirect_uri", self.redirect_uri.as_str()),
                    ])
            })
            .await?;

        Ok(res.json::<TokenResponse>().await?)
    }

    /// Obtains an app-level token, not tied to any user.
    ///
    /// Good enough for catalogue reads such as track details.
    pub async fn client_credentials_token(&self) -> Result<String, SpotifyError> {
        let res = self
            .send(|http| {
                http.post(&self.token_url)
                    .header(AUTHORIZATION, basic_authorization(&self.credentials))
                    .form(&[("grant_type", "client_credentials")])
            })
            .await?;

        Ok(res.json::<ClientCredentialsToken>().await?.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization_encoding() {
        let credentials = SpotifyCredentials {
            client_id: "client".into(),
            client_secret: "secret".into(),
        };
        // base64("client:secret")
        assert_eq!(
            basic_authorization(&credentials),
            "Basic Y2xpZW50OnNlY3JldA=="
        );
    }
}
