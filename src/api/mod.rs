//! # API Module
//!
//! HTTP handlers of the moodlist web server.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - starts the Spotify authorization-code flow with PKCE
//! - [`callback`] - exchanges the code, links the account and issues the
//!   session cookie
//! - [`logout`] - clears the session cookie
//! - [`session`] - the materialized session as JSON
//!
//! ### Playlists
//!
//! These require a signed-in user. The [`RequireSession`](crate::session::RequireSession)
//! extractor rejects anonymous requests with `401`; handlers that call
//! Spotify on the user's behalf additionally need a token that has not
//! failed to refresh.
//!
//! - [`create_playlist`] - builds a playlist for a mood (or the weather)
//! - [`save_playlist`] - bookmarks a playlist URL in the library
//! - [`get_saved_playlists`] - lists bookmarks, newest first
//! - [`delete_playlist`] - removes a bookmark owned by the caller
//!
//! ### Catalogue
//!
//! - [`get_tracks`] - track details via an app-level token
//!
//! ### Monitoring
//!
//! - [`health`] - status and version
//!
//! ## Errors
//!
//! Handlers return [`ApiError`](crate::error::ApiError), rendered as
//! `{"error": "..."}` with the matching status code.

mod auth;
mod health;
mod playlists;
mod tracks;

pub use auth::{callback, login, logout, session};
pub use health::health;
pub use playlists::{create_playlist, delete_playlist, get_saved_playlists, save_playlist};
pub use tracks::get_tracks;
