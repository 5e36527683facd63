use crate::types::{
    AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
    CreatePlaylistResponse,
};

use super::{SpotifyClient, SpotifyError};

/// Spotify accepts at most 100 URIs per add-tracks call.
const MAX_TRACKS_PER_REQUEST: usize = 100;

impl SpotifyClient {
    /// Creates a playlist on the current user's account.
    ///
    /// # Arguments
    ///
    /// * `token` - User access token with a `playlist-modify-*` scope
    /// * `name` - Playlist name shown in Spotify
    /// * `description` - Playlist description
    /// * `public` - Whether the playlist appears on the user's profile
    ///
    /// # Returns
    ///
    /// The created playlist, including its id and external URL.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError`] if the request fails or Spotify answers with a
    /// non-2xx status.
    pub async fn create_playlist(
        &self,
        token: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        let url = self.api("/me/playlists");
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
        };

        let res = self
            .send(|http| http.post(&url).bearer_auth(token).json(&body))
            .await?;
        Ok(res.json::<CreatePlaylistResponse>().await?)
    }

    /// Appends tracks to a playlist, chunked to the API limit.
    ///
    /// # Arguments
    ///
    /// * `token` - User access token
    /// * `playlist_id` - Target playlist
    /// * `uris` - Track URIs (`spotify:track:...`) in playback order
    ///
    /// # Returns
    ///
    /// The snapshot id of the last write, or `None` when `uris` is empty.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected chunk. Chunks written before it stay in
    /// the playlist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let playlist = spotify.create_playlist(token, "Rainy Day Chill", "", true).await?;
    /// spotify.add_tracks(token, &playlist.id, &uris).await?;
    /// ```
    pub async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<Option<String>, SpotifyError> {
        let url = self.api(&format!("/playlists/{playlist_id}/tracks"));
        let mut snapshot = None;

        for chunk in uris.chunks(MAX_TRACKS_PER_REQUEST) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let res = self
                .send(|http| http.post(&url).bearer_auth(token).json(&body))
                .await?;
            snapshot = Some(res.json::<AddTrackToPlaylistResponse>().await?.snapshot_id);
        }

        Ok(snapshot)
    }
}
