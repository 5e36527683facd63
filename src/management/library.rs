use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    types::{PlaylistTableRow, Profile, TokenResponse},
    utils,
};

pub const SPOTIFY_PROVIDER: &str = "spotify";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Third-party account linked to a user, with the tokens issued at link time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub user_id: String,
    pub provider: String,
    pub provider_account_id: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: i64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
}

impl LinkedAccount {
    pub fn spotify(
        user_id: &str,
        profile: &Profile,
        grant: &TokenResponse,
        expires_at: i64,
    ) -> Self {
        LinkedAccount {
            user_id: user_id.to_string(),
            provider: SPOTIFY_PROVIDER.to_string(),
            provider_account_id: profile.id.clone(),
            access_token: grant.access_token.clone(),
            refresh_token: grant.refresh_token.clone().filter(|rt| !rt.is_empty()),
            expires_at,
            scope: grant.scope.clone(),
            market: profile.country.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlaylist {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub spotify_playlist_url: String,
    pub created_at: DateTime<Utc>,
}

impl SavedPlaylist {
    pub fn table_row(&self) -> PlaylistTableRow {
        PlaylistTableRow {
            saved: self.created_at.format("%Y-%m-%d %H:%M").to_string(),
            name: self.name.clone(),
            url: self.spotify_playlist_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LibraryData {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    accounts: Vec<LinkedAccount>,
    #[serde(default)]
    playlists: Vec<SavedPlaylist>,
}

/// Persistence for users, linked accounts and saved playlists.
///
/// The whole library is one JSON document. Every mutation rewrites it while
/// holding the lock, so concurrent handlers never interleave writes. A change
/// becomes visible in memory only after it was written.
pub struct Library {
    path: PathBuf,
    data: Mutex<LibraryData>,
}

impl Library {
    /// Opens the library at `path`, starting empty when the file is absent.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref().to_path_buf();
        let data = match async_fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => LibraryData::default(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LibraryData::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, data: &LibraryData) -> Result<(), LibraryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(data)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Writes `next` to disk and only then makes it the in-memory state.
    async fn commit(&self, current: &mut LibraryData, next: LibraryData) -> Result<(), LibraryError> {
        self.persist(&next).await?;
        *current = next;
        Ok(())
    }

    /// Finds the user linked to this Spotify profile, creating one if needed.
    pub async fn resolve_user(&self, profile: &Profile) -> Result<User, LibraryError> {
        let mut data = self.data.lock().await;

        let linked_user = data
            .accounts
            .iter()
            .find(|a| a.provider == SPOTIFY_PROVIDER && a.provider_account_id == profile.id)
            .map(|a| a.user_id.clone());

        if let Some(user_id) = linked_user {
            if let Some(user) = data.users.iter().find(|u| u.id == user_id) {
                return Ok(user.clone());
            }
        }

        let user = User {
            id: utils::generate_id(),
            name: profile.display_name.clone(),
            email: profile.email.clone(),
            created_at: Utc::now(),
        };
        let mut next = data.clone();
        next.users.push(user.clone());
        self.commit(&mut data, next).await?;
        Ok(user)
    }

    /// Stores the account link, replacing an earlier link of the same account.
    ///
    /// A link without a refresh token keeps the one stored before.
    pub async fn link_account(&self, mut account: LinkedAccount) -> Result<LinkedAccount, LibraryError> {
        let mut data = self.data.lock().await;

        let mut next = data.clone();
        let existing = next.accounts.iter().position(|a| {
            a.provider == account.provider && a.provider_account_id == account.provider_account_id
        });

        if let Some(idx) = existing {
            let previous = next.accounts.remove(idx);
            if account.refresh_token.is_none() {
                account.refresh_token = previous.refresh_token;
            }
            if account.market.is_none() {
                account.market = previous.market;
            }
        }

        next.accounts.push(account.clone());
        self.commit(&mut data, next).await?;
        Ok(account)
    }

    pub async fn find_account(&self, user_id: &str) -> Option<LinkedAccount> {
        let data = self.data.lock().await;
        data.accounts
            .iter()
            .find(|a| a.user_id == user_id && a.provider == SPOTIFY_PROVIDER)
            .cloned()
    }

    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        spotify_playlist_url: &str,
    ) -> Result<SavedPlaylist, LibraryError> {
        let mut data = self.data.lock().await;

        let playlist = SavedPlaylist {
            id: utils::generate_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            spotify_playlist_url: spotify_playlist_url.to_string(),
            created_at: Utc::now(),
        };
        let mut next = data.clone();
        next.playlists.push(playlist.clone());
        self.commit(&mut data, next).await?;
        Ok(playlist)
    }

    /// Playlists of one user, newest first.
    pub async fn find_playlists(&self, user_id: &str) -> Vec<SavedPlaylist> {
        let data = self.data.lock().await;
        let mut playlists: Vec<SavedPlaylist> = data
            .playlists
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        // stable sort keeps insertion order for equal timestamps, so reverse
        // insertion order first
        playlists.reverse();
        playlists.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        playlists
    }

    /// All playlists across users, newest first.
    pub async fn all_playlists(&self) -> Vec<SavedPlaylist> {
        let data = self.data.lock().await;
        let mut playlists = data.playlists.clone();
        playlists.reverse();
        playlists.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        playlists
    }

    pub async fn find_playlist(&self, id: &str) -> Option<SavedPlaylist> {
        let data = self.data.lock().await;
        data.playlists.iter().find(|p| p.id == id).cloned()
    }

    /// Removes a playlist; returns whether anything was deleted.
    pub async fn delete_playlist(&self, id: &str) -> Result<bool, LibraryError> {
        let mut data = self.data.lock().await;
        if !data.playlists.iter().any(|p| p.id == id) {
            return Ok(false);
        }

        let mut next = data.clone();
        next.playlists.retain(|p| p.id != id);
        self.commit(&mut data, next).await?;
        Ok(true)
    }
}
