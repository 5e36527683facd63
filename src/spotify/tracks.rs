use crate::types::{SearchResponse, SeveralTracksResponse, Track};

use super::{SpotifyClient, SpotifyError};

/// Spotify caps "get several tracks" at 50 ids per call.
pub const MAX_TRACK_IDS: usize = 50;

impl SpotifyClient {
    /// Searches the catalogue for tracks matching a free-text query.
    ///
    /// # Arguments
    ///
    /// * `token` - User access token
    /// * `query` - Search string, e.g. `"genre:jazz rainy"`
    /// * `market` - ISO country code the results must be playable in
    /// * `limit` - Page size, Spotify allows up to 50
    ///
    /// # Returns
    ///
    /// The first page of matching tracks. A response without a `tracks`
    /// section yields an empty list.
    ///
    /// # Errors
    ///
    /// [`SpotifyError::Status`] when Spotify rejects the call (a `401` means the
    /// token expired), [`SpotifyError::Http`] on transport failure or timeout.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let tracks = spotify.search_tracks(token, "genre:lo-fi", "DE", 50).await?;
    /// ```
    pub async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        market: &str,
        limit: u32,
    ) -> Result<Vec<Track>, SpotifyError> {
        let url = self.api("/search");
        let limit = limit.to_string();
        let res = self
            .send(|http| {
                http.get(&url).bearer_auth(token).query(&[
                    ("q", query),
                    ("type", "track"),
                    ("market", market),
                    ("limit", limit.as_str()),
                ])
            })
            .await?;

        let search = res.json::<SearchResponse>().await?;
        Ok(search.tracks.map(|page| page.items).unwrap_or_default())
    }

    /// Looks up track details; unknown ids are skipped.
    ///
    /// Ids are sent in chunks of [`MAX_TRACK_IDS`].
    ///
    /// # Errors
    ///
    /// Fails on the first chunk Spotify rejects; tracks from earlier chunks
    /// are discarded.
    pub async fn several_tracks(&self, token: &str, ids: &[String]) -> Result<Vec<Track>, SpotifyError> {
        let url = self.api("/tracks");
        let mut tracks = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_TRACK_IDS) {
            let joined = chunk.join(",");
            let res = self
                .send(|http| {
                    http.get(&url)
                        .bearer_auth(token)
                        .query(&[("ids", joined.as_str())])
                })
                .await?;
            let several = res.json::<SeveralTracksResponse>().await?;
            tracks.extend(several.tracks.into_iter().flatten());
        }

        Ok(tracks)
    }
}
