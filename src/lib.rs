//! Mood-based Spotify playlist service library
//!
//! This library powers the `moodlist` web service. A signed-in user picks a mood
//! (or lets the current weather pick one), a playlist is generated on their
//! Spotify account, and the result can be saved to a personal library.
//!
//! The part with real state is the Spotify session: access tokens expire, and
//! every authenticated request has to check the token and silently refresh it
//! before touching the Spotify Web API.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for sign-in, playlists, tracks and health
//! - `cli` - Command-line subcommands around the server and local library
//! - `config` - Environment loading and the typed application configuration
//! - `error` - HTTP-facing error type
//! - `management` - File-backed persistence of users, linked accounts and playlists
//! - `mood` - Mood catalogue and weather to mood mapping
//! - `server` - Router assembly and the HTTP listener
//! - `session` - Token state, refresh procedure, session materializer and request gate
//! - `spotify` - Spotify Web API and accounts client
//! - `types` - Wire types shared with Spotify and the HTTP API
//! - `utils` - PKCE helpers, identifiers and small collection helpers
//! - `weather` - Current weather lookup
//!
//! # Example
//!
//! ```
//! use moodlist::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> moodlist::Res<()> {
//!     config::load_env().await?;
//!     let config = config::AppConfig::from_env()?;
//!     server::serve(config).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod mood;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod weather;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the edges of the application (binary, CLI, server start-up) where
/// errors of different kinds are only reported, never matched on.
///
/// # Example
///
/// ```
/// use moodlist::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Library opened with {} playlists", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal start-up errors in the binary. Request handlers never call
/// this; they return an [`error::ApiError`] instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("No .env file found, relying on process environment");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
