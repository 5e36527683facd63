//! Configuration management for moodlist.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Everything is read once at start-up into
//! an [`AppConfig`] which is then passed explicitly to the components that
//! need it; nothing downstream reads the process environment.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{
    env,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_SCOPE: &str = "user-read-email user-read-private playlist-read-private playlist-modify-public playlist-modify-private";
pub const DEFAULT_OPENWEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives under `moodlist/.env` in the platform data directory:
/// - Linux: `~/.local/share/moodlist/.env`
/// - macOS: `~/Library/Application Support/moodlist/.env`
/// - Windows: `%LOCALAPPDATA%/moodlist/.env`
///
/// A missing file is not an error; the process environment alone may carry
/// the configuration (containers, CI).
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    load_env_file(&data_dir().join(".env")).await
}

/// Loads `path` into the process environment if it exists.
///
/// Variables already set in the environment win over the file. This runs
/// before logging is set up, so `RUST_LOG` can come from the file too.
pub async fn load_env_file(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the application's directory inside the platform data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodlist");
    path
}

/// Client credentials of the registered Spotify application.
///
/// Used for the basic-auth header on every token endpoint call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Process-wide configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: SocketAddr,
    pub public_url: String,
    pub credentials: SpotifyCredentials,
    pub session_secret: String,
    pub secure_cookies: bool,
    pub database_path: PathBuf,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    pub spotify_api_url: String,
    pub spotify_redirect_uri: String,
    pub spotify_scope: String,
    pub openweather_api_key: Option<String>,
    pub openweather_api_url: String,
    pub http_timeout: Duration,
    http: reqwest::Client,
}

impl AppConfig {
    /// Builds the configuration from the process environment.
    ///
    /// # Required env vars
    /// - `SPOTIFY_CLIENT_ID`
    /// - `SPOTIFY_CLIENT_SECRET`
    /// - `SESSION_SECRET`: key material for the encrypted session cookie
    ///
    /// Everything else falls back to a default, see the `DEFAULT_*` constants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for an unset required variable and
    /// [`ConfigError::Invalid`] for values that fail to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let client_id = require("SPOTIFY_CLIENT_ID")?;
        let client_secret = require("SPOTIFY_CLIENT_SECRET")?;
        let session_secret = require("SESSION_SECRET")?;

        let server_addr: SocketAddr = get("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "SERVER_ADDRESS",
                reason: e.to_string(),
            })?;

        let public_url = get("PUBLIC_URL")
            .unwrap_or_else(|| format!("http://{server_addr}"))
            .trim_end_matches('/')
            .to_string();

        let spotify_redirect_uri = get("SPOTIFY_REDIRECT_URI")
            .unwrap_or_else(|| format!("{public_url}/api/auth/callback"));

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    name: "HTTP_TIMEOUT_SECS",
                    reason: format!("'{raw}' is not a number of seconds"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: "HTTP_TIMEOUT_SECS",
                        reason: "must be at least one second".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let secure_cookies = matches!(
            get("SECURE_COOKIES").as_deref(),
            Some("1") | Some("true")
        ) || public_url.starts_with("https://");

        let database_path = match get("DATABASE_URL") {
            Some(url) => database_path_from_url(&url),
            None => data_dir().join("library.json"),
        };

        let http = reqwest::Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build HTTP client");
                ConfigError::HttpClient(e.to_string())
            })?;

        Ok(Self {
            server_addr,
            public_url,
            credentials: SpotifyCredentials {
                client_id,
                client_secret,
            },
            session_secret,
            secure_cookies,
            database_path,
            spotify_auth_url: get("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_AUTH_URL.to_string()),
            spotify_token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string()),
            spotify_api_url: get("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            spotify_redirect_uri,
            spotify_scope: get("SPOTIFY_API_AUTH_SCOPE")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_SCOPE.to_string()),
            openweather_api_key: get("OPENWEATHER_API_KEY"),
            openweather_api_url: get("OPENWEATHER_API_URL")
                .unwrap_or_else(|| DEFAULT_OPENWEATHER_API_URL.to_string()),
            http_timeout,
            http,
        })
    }

    /// Shared HTTP client with the configured outbound timeout.
    ///
    /// Built once while loading the configuration; clones share the
    /// connection pool.
    pub fn http_client(&self) -> reqwest::Client {
        self.http.clone()
    }
}

/// Turns the persistence connection string into a file path.
///
/// Accepts plain paths as well as `file://` and `file:` URLs.
fn database_path_from_url(url: &str) -> PathBuf {
    let path = url
        .strip_prefix("file://")
        .or_else(|| url.strip_prefix("file:"))
        .unwrap_or(url);
    PathBuf::from(path)
}
