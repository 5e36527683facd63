use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{management::LibraryError, spotify::SpotifyError, weather::WeatherError};

/// Errors surfaced by the HTTP handlers.
///
/// Every variant renders as `{"error": "..."}` with a matching status code.
/// Upstream and internal failures only expose a generic message; the detail
/// goes to the server log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No identity in the session.
    #[error("Unauthorized")]
    Unauthenticated,

    /// The Spotify access token could not be refreshed; the account has to be
    /// linked again.
    #[error("RefreshAccessTokenError")]
    UpstreamAuthExpired,

    /// A Spotify or weather call failed for a reason other than auth.
    #[error("Upstream request failed: {0}")]
    UpstreamRequestFailed(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Server-side failure; the message is safe to show, details are logged
    /// where the error is converted.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::UpstreamAuthExpired => StatusCode::UNAUTHORIZED,
            Self::UpstreamRequestFailed(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::UpstreamRequestFailed(detail) => {
                tracing::error!(error = %detail, "Upstream request failed");
                "An unexpected Spotify API error occurred.".to_string()
            }
            other => other.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

impl From<SpotifyError> for ApiError {
    fn from(e: SpotifyError) -> Self {
        match e {
            SpotifyError::Status { status, .. } if status == StatusCode::UNAUTHORIZED.as_u16() => {
                Self::UpstreamAuthExpired
            }
            other => Self::UpstreamRequestFailed(other.to_string()),
        }
    }
}

impl From<LibraryError> for ApiError {
    fn from(e: LibraryError) -> Self {
        tracing::error!(error = %e, "Library operation failed");
        Self::Internal("Failed to access the playlist library.".to_string())
    }
}

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        tracing::error!(error = %e, "Weather lookup failed");
        Self::Internal("Failed to get weather data.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::UpstreamAuthExpired.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::UpstreamRequestFailed("boom".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_auth_expired_message() {
        assert_eq!(
            ApiError::UpstreamAuthExpired.to_string(),
            "RefreshAccessTokenError"
        );
    }

    #[test]
    fn test_spotify_unauthorized_maps_to_expired() {
        let err = SpotifyError::Status {
            status: 401,
            message: "The access token expired".into(),
        };
        assert!(matches!(ApiError::from(err), ApiError::UpstreamAuthExpired));

        let err = SpotifyError::Status {
            status: 429,
            message: "API rate limit exceeded".into(),
        };
        assert!(matches!(
            ApiError::from(err),
            ApiError::UpstreamRequestFailed(_)
        ));
    }
}
