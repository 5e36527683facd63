use crate::types::Profile;

use super::{SpotifyClient, SpotifyError};

impl SpotifyClient {
    /// Fetches the profile of the user owning `token`.
    ///
    /// `country` doubles as the market for track searches.
    ///
    /// # Errors
    ///
    /// [`SpotifyError::Status`] with status `401` when the token is no longer
    /// valid.
    pub async fn current_user(&self, token: &str) -> Result<Profile, SpotifyError> {
        let url = self.api("/me");
        let res = self.send(|http| http.get(&url).bearer_auth(token)).await?;
        Ok(res.json::<Profile>().await?)
    }
}
