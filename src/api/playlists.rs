use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    error::ApiError,
    mood::{Mood, WEATHER_MOOD},
    server::AppState,
    session::RequireSession,
    spotify::SpotifyClient,
    types::{
        CreateMoodPlaylistBody, CreateMoodPlaylistResponse, DeletePlaylistBody, SavePlaylistBody,
        SuccessResponse, Track,
    },
    utils,
};

const DEFAULT_MARKET: &str = "US";
const SEARCH_LIMIT: u32 = 50;
const PLAYLIST_SIZE: usize = 30;

/// Builds a Spotify playlist for a mood and returns its URL.
///
/// The mood `weather` is resolved from the current conditions at the given
/// coordinates first.
pub async fn create_playlist(
    State(state): State<AppState>,
    session: RequireSession,
    Json(body): Json<CreateMoodPlaylistBody>,
) -> Result<Json<CreateMoodPlaylistResponse>, ApiError> {
    let token = session.0.bearer()?.to_string();

    let requested = body.mood.unwrap_or_default();
    let mood = if requested.eq_ignore_ascii_case(WEATHER_MOOD) {
        state
            .weather
            .current_mood(body.latitude, body.longitude)
            .await?
    } else {
        requested
            .parse::<Mood>()
            .map_err(|_| ApiError::BadRequest("Invalid mood specified".into()))?
    };

    let market = state
        .library
        .find_account(session.user_id())
        .await
        .and_then(|account| account.market)
        .unwrap_or_else(|| DEFAULT_MARKET.to_string());

    let tracks = search_mood(&state.spotify, &token, mood, &market).await?;
    let uris = utils::pick_random(utils::unique_track_uris(&tracks), PLAYLIST_SIZE);
    if uris.is_empty() {
        return Err(ApiError::NotFound(
            "Could not find any tracks matching this mood.".into(),
        ));
    }

    let playlist = state
        .spotify
        .create_playlist(&token, mood.playlist_name(), &mood.description(), true)
        .await?;
    state.spotify.add_tracks(&token, &playlist.id, &uris).await?;

    tracing::info!(%mood, playlist_id = %playlist.id, tracks = uris.len(), "Playlist created");

    let playlist_url = playlist
        .external_urls
        .spotify
        .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", playlist.id));

    Ok(Json(CreateMoodPlaylistResponse { playlist_url }))
}

/// Runs every search query of `mood` concurrently and concatenates the
/// results in query order.
async fn search_mood(
    spotify: &Arc<SpotifyClient>,
    token: &str,
    mood: Mood,
    market: &str,
) -> Result<Vec<Track>, ApiError> {
    let handles: Vec<_> = mood
        .queries()
        .iter()
        .map(|&query| {
            let spotify = Arc::clone(spotify);
            let token = token.to_string();
            let market = market.to_string();
            tokio::spawn(async move {
                spotify
                    .search_tracks(&token, query, &market, SEARCH_LIMIT)
                    .await
            })
        })
        .collect();

    let mut tracks = Vec::new();
    for handle in handles {
        let found = handle.await.map_err(|e| {
            tracing::error!(error = %e, "Search task failed");
            ApiError::Internal("Failed to search tracks.".into())
        })??;
        tracks.extend(found);
    }
    Ok(tracks)
}

/// Records a playlist in the signed-in user's library.
///
/// # Arguments
///
/// * `playlistName` - Name to list it under
/// * `playlistUrl` - Spotify URL of the playlist
///
/// Both are required and must not be blank.
///
/// # Errors
///
/// `400` when either field is missing, `500` when the library cannot be
/// written.
pub async fn save_playlist(
    State(state): State<AppState>,
    session: RequireSession,
    Json(body): Json<SavePlaylistBody>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let name = body.playlist_name.filter(|n| !n.trim().is_empty());
    let url = body.playlist_url.filter(|u| !u.trim().is_empty());
    let (Some(name), Some(url)) = (name, url) else {
        return Err(ApiError::BadRequest(
            "Playlist name and URL are required".into(),
        ));
    };

    state
        .library
        .create_playlist(session.user_id(), &name, &url)
        .await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: "Playlist saved!".into(),
    }))
}

/// Saved playlists of the signed-in user, newest first.
pub async fn get_saved_playlists(
    State(state): State<AppState>,
    session: RequireSession,
) -> Json<Value> {
    let playlists = state.library.find_playlists(session.user_id()).await;
    Json(json!({ "playlists": playlists }))
}

/// Removes a saved playlist owned by the signed-in user.
///
/// A playlist that does not exist and one owned by someone else both answer
/// `404`.
pub async fn delete_playlist(
    State(state): State<AppState>,
    session: RequireSession,
    Json(body): Json<DeletePlaylistBody>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Some(id) = body.playlist_id.filter(|id| !id.is_empty()) else {
        return Err(ApiError::BadRequest("Playlist ID is required".into()));
    };

    let owned = state
        .library
        .find_playlist(&id)
        .await
        .is_some_and(|p| p.user_id == session.user_id());

    if !owned || !state.library.delete_playlist(&id).await? {
        return Err(ApiError::NotFound(
            "Playlist not found or you do not have permission to delete it.".into(),
        ));
    }

    Ok(Json(SuccessResponse {
        success: true,
        message: "Playlist deleted!".into(),
    }))
}
