use tabled::Table;

use crate::{
    config::AppConfig, error, info, management::Library, types::PlaylistTableRow, warning,
};

/// Prints saved playlists, optionally only those of one user.
pub async fn library(config: &AppConfig, user: Option<String>) {
    let library = match Library::open(&config.database_path).await {
        Ok(library) => library,
        Err(e) => error!(
            "Cannot open library at {}. Err: {}",
            config.database_path.display(),
            e
        ),
    };

    let playlists = match &user {
        Some(user_id) => library.find_playlists(user_id).await,
        None => library.all_playlists().await,
    };

    if playlists.is_empty() {
        match user {
            Some(user_id) => warning!("No saved playlists for user {}.", user_id),
            None => warning!("No saved playlists in {}.", library.path().display()),
        }
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists.iter().map(|p| p.table_row()).collect();
    info!("{} saved playlist(s)", rows.len());
    println!("{}", Table::new(rows));
}
